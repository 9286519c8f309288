use crate::error::EvalError;

/// Present value of an annuity; shared by `Pmt`/`IPmt`/`PPmt`/`PV`/`FV`.
fn annuity_factor(rate: f64, nper: f64) -> f64 {
    if rate == 0.0 {
        nper
    } else {
        (1.0 - (1.0 + rate).powf(-nper)) / rate
    }
}

pub fn pv(rate: f64, nper: f64, pmt: f64, fv: f64, due: bool) -> Result<f64, EvalError> {
    let due_factor = if due { 1.0 + rate } else { 1.0 };
    let factor = annuity_factor(rate, nper);
    Ok(-(pmt * factor * due_factor + fv * (1.0 + rate).powf(-nper)))
}

pub fn fv(rate: f64, nper: f64, pmt: f64, pv: f64, due: bool) -> Result<f64, EvalError> {
    let due_factor = if due { 1.0 + rate } else { 1.0 };
    let factor = annuity_factor(rate, nper);
    Ok(-(pv * (1.0 + rate).powf(nper) + pmt * factor * due_factor))
}

pub fn pmt(rate: f64, nper: f64, pv: f64, fv: f64, due: bool) -> Result<f64, EvalError> {
    let due_factor = if due { 1.0 + rate } else { 1.0 };
    let factor = annuity_factor(rate, nper);
    if factor == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(-(pv + fv * (1.0 + rate).powf(-nper)) / (factor * due_factor))
}

pub fn ipmt(rate: f64, per: f64, nper: f64, pv: f64, fv: f64, due: bool) -> Result<f64, EvalError> {
    let payment = pmt(rate, nper, pv, fv, due)?;
    let balance = fv_at(rate, per - 1.0, payment, pv, due);
    Ok(balance * rate)
}

pub fn ppmt(rate: f64, per: f64, nper: f64, pv: f64, fv: f64, due: bool) -> Result<f64, EvalError> {
    let payment = pmt(rate, nper, pv, fv, due)?;
    Ok(payment - ipmt(rate, per, nper, pv, fv, due)?)
}

fn fv_at(rate: f64, periods_elapsed: f64, payment: f64, pv: f64, due: bool) -> f64 {
    let due_factor = if due { 1.0 + rate } else { 1.0 };
    let factor = annuity_factor(rate, periods_elapsed);
    -(pv * (1.0 + rate).powf(periods_elapsed) + payment * factor * due_factor)
}

/// Fixed-declining-balance depreciation for one period.
pub fn ddb(cost: f64, salvage: f64, life: f64, period: f64, factor: f64) -> f64 {
    let rate = factor / life;
    let mut book_value = cost;
    let mut depreciation = 0.0;
    let mut p = 1.0;
    while p <= period {
        depreciation = (book_value * rate).min(book_value - salvage);
        book_value -= depreciation;
        p += 1.0;
    }
    depreciation.max(0.0)
}

pub fn sln(cost: f64, salvage: f64, life: f64) -> f64 {
    (cost - salvage) / life
}

pub fn syd(cost: f64, salvage: f64, life: f64, period: f64) -> f64 {
    (cost - salvage) * (life - period + 1.0) / (life * (life + 1.0) / 2.0)
}

/// Number of periods for an annuity, the closed-form inverse of `Pmt`.
pub fn nper(rate: f64, pmt: f64, pv: f64, fv: f64, due: bool) -> Result<f64, EvalError> {
    if rate == 0.0 {
        if pmt == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(-(pv + fv) / pmt);
    }
    let due_factor = if due { 1.0 + rate } else { 1.0 };
    let numerator = pmt * due_factor - fv * rate;
    let denominator = pv * rate + pmt * due_factor;
    let ratio = numerator / denominator;
    if denominator == 0.0 || ratio <= 0.0 {
        return Err(EvalError::Other("NPer has no real solution for these arguments".to_string()));
    }
    Ok(ratio.ln() / (1.0 + rate).ln())
}

fn cash_flow_value(rate: f64, nper: f64, pmt: f64, pv: f64, fv: f64, due: bool) -> f64 {
    if rate == 0.0 {
        return pv + pmt * nper + fv;
    }
    let due_factor = if due { 1.0 + rate } else { 1.0 };
    let growth = (1.0 + rate).powf(nper);
    pv * growth + pmt * due_factor * (growth - 1.0) / rate + fv
}

/// Interest rate per period, solved by Newton's method since there is no
/// closed form (mirrors the iterative approach spreadsheet `RATE`
/// implementations use).
pub fn rate(nper: f64, pmt: f64, pv: f64, fv: f64, due: bool, guess: f64) -> Result<f64, EvalError> {
    let mut r = if guess == 0.0 { 0.1 } else { guess };
    const STEP: f64 = 1e-7;
    for _ in 0..100 {
        let f0 = cash_flow_value(r, nper, pmt, pv, fv, due);
        let f1 = cash_flow_value(r + STEP, nper, pmt, pv, fv, due);
        let derivative = (f1 - f0) / STEP;
        if derivative == 0.0 {
            return Err(EvalError::Other("Rate failed to converge".to_string()));
        }
        let next = r - f0 / derivative;
        if (next - r).abs() < 1e-10 {
            return Ok(next);
        }
        r = next;
    }
    Err(EvalError::Other("Rate failed to converge".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sln() {
        assert_eq!(sln(10000.0, 1000.0, 10.0), 900.0);
    }

    #[test]
    fn test_pmt_zero_rate_is_linear() {
        let result = pmt(0.0, 12.0, 1200.0, 0.0, false).unwrap();
        assert!((result - (-100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_nper_matches_pmt_round_trip() {
        let payment = pmt(0.01, 24.0, 1000.0, 0.0, false).unwrap();
        let periods = nper(0.01, payment, 1000.0, 0.0, false).unwrap();
        assert!((periods - 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_nper_zero_rate_is_linear() {
        let periods = nper(0.0, -100.0, 1200.0, 0.0, false).unwrap();
        assert!((periods - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_matches_pmt_round_trip() {
        let payment = pmt(0.01, 24.0, 1000.0, 0.0, false).unwrap();
        let r = rate(24.0, payment, 1000.0, 0.0, false, 0.1).unwrap();
        assert!((r - 0.01).abs() < 1e-6);
    }
}
