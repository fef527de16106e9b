extern crate piecewise_spline;

use piecewise_spline::{Interpolant, SplineBuilder, SplineKind};

fn main() {

    let x_min = 0.0;
    let x_max = 6.0;

    let x = [x_min, 1.0, 2.0, 2.5, 4.0, 5.0, x_max];
    let y = [1.0, 1.0, 1.0, 3.0, 3.0, 1.0, 1.0];

    let kinds = [
        SplineKind::Linear,
        SplineKind::Cubic,
        SplineKind::Akima,
        SplineKind::Bessel,
        SplineKind::Pchip,
        SplineKind::Quintic,
    ];
    let splines: Vec<_> = kinds
        .iter()
        .map(|kind| SplineBuilder::new(*kind).build_from(&x, &y).unwrap())
        .collect();

    let number_of_steps = 60;
    let step = (x_max - x_min) / number_of_steps as f64;

    let header: Vec<&str> = kinds.iter().map(|kind| kind.name()).collect();
    println!("x;{}", header.join(";"));
    for i in 0..=number_of_steps {
        let x = x_min + step * i as f64;
        let row: Vec<String> = splines
            .iter()
            .map(|spline| format!("{:.3}", spline.eval(x).unwrap()))
            .collect();
        println!("{:.2};{}", x, row.join(";"));
    }
}
