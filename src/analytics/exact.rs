//mean and population deviation computed exactly over the binary values of the inputs,
//rounded to f64 once at the end

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

//quotient width before the final rounding, two bits past the 53-bit mantissa
const QUOTIENT_BITS: i64 = 55;

//root width before the final rounding, matching 2 * 53 + 3 bits of radicand
const RADICAND_BITS: i64 = 2 * 53 + 3;

//x == mantissa * 2^exponent, mantissa odd unless x is zero
fn decompose(x: f64) -> (i64, i64) {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = (bits & ((1u64 << 52) - 1)) as i64;

    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1i64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return (0, 0);
    }

    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exponent += i64::from(zeros);

    if bits >> 63 == 1 {
        mantissa = -mantissa;
    }
    (mantissa, exponent)
}

//finite values as integers over a shared power of two
struct ScaledValues {
    integers: Vec<BigInt>,
    exponent: i64,
}

impl ScaledValues {
    fn new(values: &[f64]) -> Self {
        let parts: Vec<(i64, i64)> = values.iter().map(|&x| decompose(x)).collect();
        let exponent = parts
            .iter()
            .filter(|(mantissa, _)| *mantissa != 0)
            .map(|(_, exponent)| *exponent)
            .min()
            .unwrap_or(0);

        let integers = parts
            .iter()
            .map(|&(mantissa, e)| {
                if mantissa == 0 {
                    BigInt::zero()
                } else {
                    BigInt::from(mantissa) << ((e - exponent) as usize)
                }
            })
            .collect();

        ScaledValues { integers, exponent }
    }

    fn sum(&self) -> BigInt {
        self.integers.iter().sum()
    }

    fn sum_of_squares(&self) -> BigInt {
        self.integers.iter().map(|x| x * x).sum()
    }
}

//arithmetic mean, correctly rounded
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    if values.iter().any(|x| !x.is_finite()) {
        return values.iter().sum::<f64>() / values.len() as f64;
    }

    let scaled = ScaledValues::new(values);
    let count = BigUint::from(values.len() as u64);
    ratio_to_f64(&scaled.sum(), &count, scaled.exponent)
}

//population standard deviation, the correctly rounded root of the exact variance
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    if values.iter().any(|x| !x.is_finite()) {
        return f64::NAN;
    }

    let scaled = ScaledValues::new(values);
    let count = BigInt::from(values.len() as u64);
    let sum = scaled.sum();

    //n^2 * variance, in units of 2^(2 * exponent)
    let spread = &count * scaled.sum_of_squares() - &sum * &sum;
    let count_squared = &count * &count;

    sqrt_ratio_to_f64(spread.magnitude(), count_squared.magnitude(), scaled.exponent)
}

//numer / denom * 2^exponent rounded half-to-even
fn ratio_to_f64(numer: &BigInt, denom: &BigUint, exponent: i64) -> f64 {
    if numer.is_zero() {
        return 0.0;
    }

    let magnitude = numer.magnitude();
    let shift = QUOTIENT_BITS - (magnitude.bits() as i64 - denom.bits() as i64);
    let (n, d) = if shift >= 0 {
        (magnitude << (shift as usize), denom.clone())
    } else {
        (magnitude.clone(), denom << ((-shift) as usize))
    };

    let quotient = &n / &d;
    let inexact = !(&n % &d).is_zero();
    let value = scale_by_power_of_two(round_to_odd(&quotient, inexact), exponent - shift);

    if numer.sign() == Sign::Minus {
        -value
    } else {
        value
    }
}

//sqrt(n / d) * 2^exponent rounded half-to-even
fn sqrt_ratio_to_f64(n: &BigUint, d: &BigUint, exponent: i64) -> f64 {
    if n.is_zero() {
        return 0.0;
    }

    let half_shift = (n.bits() as i64 - d.bits() as i64 - RADICAND_BITS).div_euclid(2);
    let (root, inexact) = if half_shift >= 0 {
        isqrt_ratio(n, &(d << ((2 * half_shift) as usize)))
    } else {
        isqrt_ratio(&(n << ((-2 * half_shift) as usize)), d)
    };

    scale_by_power_of_two(round_to_odd(&root, inexact), half_shift + exponent)
}

//floor(sqrt(n / d)) and whether it dropped anything
fn isqrt_ratio(n: &BigUint, d: &BigUint) -> (BigUint, bool) {
    let root = (n / d).sqrt();
    let exact = &root * &root * d == *n;
    (root, !exact)
}

//an inexact integer gets its low bit set, so the f64 conversion rounds as if it saw every bit
fn round_to_odd(value: &BigUint, inexact: bool) -> f64 {
    value
        .to_u64()
        .map_or(f64::NAN, |bits| (bits | u64::from(inexact)) as f64)
}

//exact while the result stays in the normal range
fn scale_by_power_of_two(mut value: f64, mut exponent: i64) -> f64 {
    while exponent > 1000 {
        value *= 2f64.powi(1000);
        exponent -= 1000;
    }
    while exponent < -1000 {
        value *= 2f64.powi(-1000);
        exponent += 1000;
    }
    value * 2f64.powi(exponent as i32)
}
