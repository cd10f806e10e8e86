use plotters::prelude::*;

/// Index of the strictly greatest value; ties break to the lowest index.
/// That first-maximum behavior is relied on by greedy action selection.
pub fn argmax<T: PartialOrd>(values: impl Iterator<Item = T>) -> usize {
    let mut result = 0;
    let mut max: Option<T> = None;
    for (i, v) in values.enumerate() {
        let greater = match &max {
            Some(m) => v > *m,
            None => true,
        };
        if greater {
            max = Some(v);
            result = i;
        }
    }
    result
}

/// Chunked mean over `window`-sized slices, tail included.
pub fn moving_average(window: usize, values: &[f64]) -> Vec<f64> {
    let window = window.max(1);
    let mut result: Vec<f64> = vec![];
    let mut start = 0;
    while start < values.len() {
        let end = (start + window).min(values.len());
        let slice = &values[start..end];
        let sum: f64 = slice.iter().sum();
        result.push(sum / window as f64);
        start = end;
    }
    result
}

/// Render one line series per data vector into `<title>.png`.
pub fn plot_moving_average(data: &[Vec<f64>], colors: &[&RGBColor], legends: &[&str], title: &str) {
    let max_len = data.iter().map(|d| d.len()).max().unwrap_or(0);
    if max_len == 0 {
        return;
    }
    let (min_y, max_y) = data
        .iter()
        .flatten()
        .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let pad = (max_y - min_y).abs().max(1.0) * 0.05;

    let filename = format!("{}.png", title.replace(' ', "_").to_lowercase());
    let root = BitMapBackend::new(&filename, (1080, 720)).into_drawing_area();
    root.fill(&WHITE).unwrap();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..max_len, (min_y - pad)..(max_y + pad))
        .unwrap();
    chart.configure_mesh().draw().unwrap();

    for (i, series) in data.iter().enumerate() {
        let color = colors[i % colors.len()];
        chart
            .draw_series(LineSeries::new(
                series.iter().enumerate().map(|(x, y)| (x, *y)),
                color,
            ))
            .unwrap()
            .label(legends[i % legends.len()])
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .unwrap();
    root.present().unwrap();
}

#[cfg(test)]
mod tests {
    use super::{argmax, moving_average};

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax([1.0, 3.0, 3.0, 2.0].iter()), 1);
        assert_eq!(argmax([5.0].iter()), 0);
        assert_eq!(argmax([-2.0, -1.0, -3.0].iter()), 1);
    }

    #[test]
    fn moving_average_chunks() {
        let ma = moving_average(2, &[1.0, 3.0, 5.0, 7.0]);
        assert_eq!(ma, vec![2.0, 6.0]);
    }

    #[test]
    fn moving_average_zero_window_is_harmless() {
        assert_eq!(moving_average(0, &[4.0]), vec![4.0]);
    }
}
