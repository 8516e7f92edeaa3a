//! Plot data for the temperature trend chart.
//!
//! Day indices are the x axis (0, 1, 2, ...). With enough points each series
//! is drawn as a not-a-knot cubic interpolating spline, otherwise as straight
//! segments through the raw values.

use crate::types::Forecast;

/// Number of samples taken along a smoothed series
pub const SMOOTH_SAMPLES: usize = 300;

/// Fewest points a cubic spline can be fitted through
pub const MIN_SPLINE_POINTS: usize = 4;

pub const MAX_SERIES_NAME: &str = "Max Temp";
pub const MIN_SERIES_NAME: &str = "Min Temp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Smooth,
    Straight,
}

/// One plotted line
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    /// `[x, y]` pairs ready for plotting
    pub points: Vec<[f64; 2]>,
    pub interpolation: Interpolation,
}

impl Series {
    fn build(name: &'static str, values: &[f64]) -> Self {
        match smooth(values, SMOOTH_SAMPLES) {
            Some(points) => Self {
                name,
                points,
                interpolation: Interpolation::Smooth,
            },
            None => Self {
                name,
                points: values
                    .iter()
                    .enumerate()
                    .map(|(i, y)| [i as f64, *y])
                    .collect(),
                interpolation: Interpolation::Straight,
            },
        }
    }
}

/// Max/min temperature series with their x axis labels
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub labels: Vec<String>,
    pub max: Series,
    pub min: Series,
}

impl TrendChart {
    /// Build both series. Inputs of unequal length are cut to the shortest.
    pub fn build(labels: &[String], max_temps: &[f64], min_temps: &[f64]) -> Self {
        let len = labels.len().min(max_temps.len()).min(min_temps.len());
        if len != labels.len() || len != max_temps.len() || len != min_temps.len() {
            tracing::warn!(
                "Chart inputs differ in length (labels={}, max={}, min={}), using {}",
                labels.len(),
                max_temps.len(),
                min_temps.len(),
                len
            );
        }

        Self {
            labels: labels[..len].to_vec(),
            max: Series::build(MAX_SERIES_NAME, &max_temps[..len]),
            min: Series::build(MIN_SERIES_NAME, &min_temps[..len]),
        }
    }

    pub fn from_forecast(forecast: &Forecast) -> Self {
        Self::build(
            &forecast.day_labels(),
            &forecast.max_temps(),
            &forecast.min_temps(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for an x position, if it falls on a day index
    pub fn label_at(&self, x: f64) -> Option<&str> {
        label_at(&self.labels, x)
    }
}

/// Axis label lookup shared with the plot's tick formatter
pub fn label_at(labels: &[String], x: f64) -> Option<&str> {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return None;
    }
    labels.get(rounded as usize).map(String::as_str)
}

/// Sample a not-a-knot cubic spline through `values` at `samples` evenly
/// spaced x positions from 0 to `values.len() - 1`.
///
/// Returns `None` when there are too few points or the system cannot be solved.
pub fn smooth(values: &[f64], samples: usize) -> Option<Vec<[f64; 2]>> {
    let spline = CubicSpline::fit(values)?;
    let last_x = (values.len() - 1) as f64;

    let points = (0..samples)
        .map(|k| {
            let x = if samples > 1 {
                last_x * k as f64 / (samples - 1) as f64
            } else {
                0.0
            };
            [x, spline.evaluate(x)]
        })
        .collect();

    Some(points)
}

/// Cubic spline over unit-spaced knots, stored as values plus second derivatives
#[derive(Debug)]
struct CubicSpline {
    values: Vec<f64>,
    second_derivs: Vec<f64>,
}

impl CubicSpline {
    fn fit(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < MIN_SPLINE_POINTS || values.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let mut matrix = vec![vec![0.0; n]; n];
        let mut rhs = vec![0.0; n];

        // Third derivative continuous across the first and last interior knots
        matrix[0][0] = 1.0;
        matrix[0][1] = -2.0;
        matrix[0][2] = 1.0;
        matrix[n - 1][n - 3] = 1.0;
        matrix[n - 1][n - 2] = -2.0;
        matrix[n - 1][n - 1] = 1.0;

        for i in 1..n - 1 {
            matrix[i][i - 1] = 1.0;
            matrix[i][i] = 4.0;
            matrix[i][i + 1] = 1.0;
            rhs[i] = 6.0 * (values[i - 1] - 2.0 * values[i] + values[i + 1]);
        }

        let second_derivs = solve(matrix, rhs)?;
        Some(Self {
            values: values.to_vec(),
            second_derivs,
        })
    }

    fn evaluate(&self, x: f64) -> f64 {
        let n = self.values.len();
        let segment = (x.floor().max(0.0) as usize).min(n - 2);
        let t = x - segment as f64;
        let u = 1.0 - t;

        let (y0, y1) = (self.values[segment], self.values[segment + 1]);
        let (m0, m1) = (self.second_derivs[segment], self.second_derivs[segment + 1]);

        m0 * u.powi(3) / 6.0 + m1 * t.powi(3) / 6.0 + (y0 - m0 / 6.0) * u + (y1 - m1 / 6.0) * t
    }
}

/// Gaussian elimination with partial pivoting
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))?;
        if matrix[pivot][col].abs() < 1e-12 {
            return None;
        }
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row][k] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }

    Some(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn labels(n: usize) -> Vec<String> {
        ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
            .iter()
            .take(n)
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_seven_points_are_smoothed() {
        let max = [12.0, 14.5, 13.0, 9.0, 10.5, 15.0, 16.0];
        let min = [4.0, 5.5, 6.0, 2.0, 1.5, 7.0, 8.0];
        let chart = TrendChart::build(&labels(7), &max, &min);

        assert_eq!(chart.max.name, "Max Temp");
        assert_eq!(chart.min.name, "Min Temp");
        assert_eq!(chart.max.interpolation, Interpolation::Smooth);
        assert_eq!(chart.max.points.len(), SMOOTH_SAMPLES);
        assert_eq!(chart.min.points.len(), SMOOTH_SAMPLES);

        let first = chart.max.points[0];
        let last = chart.max.points[SMOOTH_SAMPLES - 1];
        assert!((first[0] - 0.0).abs() < EPS && (first[1] - 12.0).abs() < EPS);
        assert!((last[0] - 6.0).abs() < EPS && (last[1] - 16.0).abs() < EPS);
    }

    #[test]
    fn test_spline_passes_through_data_points() {
        let values = [12.0, 14.5, 13.0, 9.0, 10.5, 15.0, 16.0];
        let spline = CubicSpline::fit(&values).unwrap();
        for (i, y) in values.iter().enumerate() {
            assert!((spline.evaluate(i as f64) - y).abs() < EPS, "knot {}", i);
        }
    }

    #[test]
    fn test_spline_reproduces_cubic() {
        // A not-a-knot spline through samples of a cubic is that cubic
        let f = |x: f64| 0.5 * x.powi(3) - 2.0 * x.powi(2) + x + 3.0;
        let values: Vec<f64> = (0..7).map(|i| f(i as f64)).collect();
        let spline = CubicSpline::fit(&values).unwrap();

        for x in [0.25, 1.5, 2.75, 4.1, 5.9] {
            assert!((spline.evaluate(x) - f(x)).abs() < 1e-6, "x = {}", x);
        }
    }

    #[test]
    fn test_four_points_smooth() {
        let chart = TrendChart::build(&labels(4), &[1.0, 3.0, 2.0, 5.0], &[0.0, 1.0, 0.0, 2.0]);
        assert_eq!(chart.max.interpolation, Interpolation::Smooth);
        assert_eq!(chart.max.points.len(), SMOOTH_SAMPLES);
    }

    #[test]
    fn test_few_points_are_straight() {
        let chart = TrendChart::build(&labels(2), &[10.0, 12.0], &[3.0, 4.0]);
        assert_eq!(chart.max.interpolation, Interpolation::Straight);
        assert_eq!(chart.max.points, vec![[0.0, 10.0], [1.0, 12.0]]);
        assert_eq!(chart.min.points, vec![[0.0, 3.0], [1.0, 4.0]]);

        let chart = TrendChart::build(&labels(3), &[10.0, 12.0, 11.0], &[3.0, 4.0, 2.0]);
        assert_eq!(chart.min.interpolation, Interpolation::Straight);
        assert_eq!(chart.min.points.len(), 3);

        let chart = TrendChart::build(&labels(1), &[10.0], &[3.0]);
        assert_eq!(chart.max.points, vec![[0.0, 10.0]]);
    }

    #[test]
    fn test_empty_input() {
        let chart = TrendChart::build(&[], &[], &[]);
        assert!(chart.is_empty());
        assert!(chart.max.points.is_empty());
        assert!(chart.min.points.is_empty());
    }

    #[test]
    fn test_unequal_inputs_are_truncated() {
        let chart = TrendChart::build(&labels(5), &[1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(chart.labels.len(), 3);
        assert_eq!(chart.max.interpolation, Interpolation::Straight);
    }

    #[test]
    fn test_non_finite_values_fall_back() {
        assert!(smooth(&[1.0, f64::NAN, 2.0, 3.0], SMOOTH_SAMPLES).is_none());
    }

    #[test]
    fn test_label_at() {
        let chart = TrendChart::build(&labels(7), &[0.0; 7], &[0.0; 7]);
        assert_eq!(chart.label_at(0.0), Some("Mon"));
        assert_eq!(chart.label_at(6.0), Some("Sun"));
        assert_eq!(chart.label_at(2.5), None);
        assert_eq!(chart.label_at(7.0), None);
        assert_eq!(chart.label_at(-1.0), None);
    }
}
