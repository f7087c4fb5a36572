//decimal rounding for reported figures

//rounds to `places` decimals with ties going to the even digit
//the tie is judged on the exact binary value, so 2.675 (stored as 2.67499...) becomes 2.67
//fixed-precision formatting performs exactly this rounding, then we read the digits back
pub fn round_half_even(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    format!("{:.*}", places, value).parse().unwrap_or(value)
}

//two decimal places, used for every money figure leaving the analytics module
pub fn round2(value: f64) -> f64 {
    round_half_even(value, 2)
}
