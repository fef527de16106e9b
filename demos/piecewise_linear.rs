extern crate piecewise_spline;

use piecewise_spline::{Interpolant, SplineBuilder, SplineKind};

fn main() {

    let x_min = 0.0;
    let x_max = 6.0;

    let mut builder = SplineBuilder::new(SplineKind::Linear).name("broken line");
    for (x, y) in [(x_min, 1.0), (1.0, -1.0), (2.0, 0.0), (4.0, 3.0), (5.0, 1.0), (x_max, 1.0)] {
        builder.push_back(x, y).unwrap();
    }
    let spline = builder.build().unwrap();

    let number_of_steps = 60;
    let step = (x_max - x_min) / number_of_steps as f64;

    println!("x;y;dy");
    for i in 0..=number_of_steps {
        let x = x_min + step * i as f64;
        println!("{:.2};{:.2};{:.2}", x, spline.eval(x).unwrap(), spline.eval_d(x).unwrap());
    }
}
