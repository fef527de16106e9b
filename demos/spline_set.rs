extern crate piecewise_spline;

use piecewise_spline::{SplineKind, SplineSetBuilder};

fn main() {

    // time, travelled distance, speed and gear of a short trip
    let t = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
    let s = [0.0, 3.0, 10.0, 20.0, 31.0, 40.0];
    let v = [0.0, 3.0, 4.5, 5.5, 5.0, 4.0];
    let gear = [1.0, 1.0, 2.0, 3.0, 3.0, 3.0];

    let mut set = SplineSetBuilder::new("trip")
        .x(&t)
        .column("s", SplineKind::Pchip, &s)
        .column("v", SplineKind::Akima, &v)
        .column("gear", SplineKind::Constant, &gear)
        .build()
        .unwrap();
    set.set_check_range(true);

    set.info(&mut std::io::stdout()).unwrap();

    let number_of_steps = 40;
    let step = (s[5] - s[0]) / number_of_steps as f64;

    println!("s;t;v;gear");
    for i in 0..=number_of_steps {
        let zeta = s[0] + step * i as f64;
        let t = set.intersect(zeta, "s").unwrap();
        let values = set.eval2(zeta, "s").unwrap();
        println!("{:.2};{:.3};{:.3};{}", zeta, t, values[1], values[2]);
    }
}
