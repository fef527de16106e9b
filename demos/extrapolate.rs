extern crate piecewise_spline;

use piecewise_spline::{Interpolant, SplineBuilder, SplineKind};

fn main() {

    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [1.0, 0.0, -2.0, 1.0, 1.0];

    // outside [1, 5] the boundary segments are continued
    let spline = SplineBuilder::new(SplineKind::Pchip).build_from(&x, &y).unwrap();
    let guarded = SplineBuilder::new(SplineKind::Pchip)
        .check_range(true)
        .build_from(&x, &y)
        .unwrap();

    let x_min = 0.0;
    let x_max = 6.0;
    let number_of_steps = 60;
    let step = (x_max - x_min) / number_of_steps as f64;

    println!("x;y;checked");
    for i in 0..=number_of_steps {
        let x = x_min + step * i as f64;
        let checked = match guarded.eval(x) {
            Ok(y) => format!("{:.2}", y),
            Err(_) => String::from("-"),
        };
        println!("{:.2};{:.2};{}", x, spline.eval(x).unwrap(), checked);
    }
}
