//! Text rendering: `[a+bi c-di;e+fi g+hi]`, rows separated by `;`

use crate::matrix::FunMatrix;
use num_complex::Complex64;
use std::fmt;

fn write_element(f: &mut fmt::Formatter<'_>, z: Complex64) -> fmt::Result {
    let sign = if z.im.is_sign_negative() { '-' } else { '+' };
    match f.precision() {
        Some(p) => write!(f, "{:.*}{}{:.*}i", p, z.re, sign, p, z.im.abs()),
        None => write!(f, "{}{}{}i", z.re, sign, z.im.abs()),
    }
}

impl fmt::Display for FunMatrix {
    /// Evaluates every element; meant for small operators
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for i in 0..self.rows() {
            if i > 0 {
                f.write_str(";")?;
            }
            for j in 0..self.cols() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write_element(f, self.eval(i, j))?;
            }
        }
        f.write_str("]")
    }
}
