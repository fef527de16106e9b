extern crate piecewise_spline;

use piecewise_spline::{Interpolant, SplineBuilder, SplineKind};

fn main() {

    let x_min = 0.0;
    let x_max = 6.0;

    let x = [x_min, 1.0, 2.0, 4.0, 5.0, x_max];
    let y = [1.0, -1.0, 0.0, 3.0, 1.0, 1.0];

    let natural = SplineBuilder::new(SplineKind::Cubic)
        .name("natural")
        .build_from(&x, &y)
        .unwrap();
    let clamped = SplineBuilder::new(SplineKind::Cubic)
        .name("clamped")
        .end_conditions(2.0, -2.0)
        .build_from(&x, &y)
        .unwrap();

    let number_of_steps = 60;
    let step = (x_max - x_min) / number_of_steps as f64;

    println!("x;natural;clamped");
    for i in 0..=number_of_steps {
        let x = x_min + step * i as f64;
        println!("{:.2};{:.2};{:.2}", x, natural.eval(x).unwrap(), clamped.eval(x).unwrap());
    }
}
