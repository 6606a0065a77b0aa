//! Horizontal legend strip.
//!
//! Equal-width swatches, one per legend entry, with a bottom axis ticked
//! at every entry boundary and a bold title above.

use jobs_map_classify::{Legend, TickFormat};
use jobs_map_jobs_models::config::LegendLayout;

use crate::svg::{Element, num};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Step between "nice" ticks for `count` ticks over `[start, stop]`.
fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let raw = (stop - start).abs() / count;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    if error >= 50f64.sqrt() {
        power * 10.0
    } else if error >= 10f64.sqrt() {
        power * 5.0
    } else if error >= 2f64.sqrt() {
        power * 2.0
    } else {
        power
    }
}

/// Decimals needed to print values a `step` apart.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn precision(step: f64) -> usize {
    let exponent = step.abs().log10().floor();
    if exponent.is_finite() && exponent < 0.0 {
        (-exponent) as usize
    } else {
        0
    }
}

/// Inserts `,` thousands separators into the integer part of `s`.
fn group_thousands(s: &str) -> String {
    let (sign, rest) = s.strip_prefix('-').map_or(("", s), |r| ("-", r));
    let (int, frac) = rest.split_once('.').map_or((rest, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Groups thousands in a formatted number and prints negative zero as
/// zero.
fn tidy(s: &str) -> String {
    if s.starts_with('-') && s.trim_start_matches(['-', '0', '.']).is_empty() {
        group_thousands(&s[1..])
    } else {
        group_thousands(s)
    }
}

fn format_fixed(value: f64, decimals: usize) -> String {
    tidy(&format!("{value:.decimals$}"))
}

/// Formats tick labels with the precision suited to the domain, the way
/// linear axes usually do: ten nominal ticks, fixed decimals, grouped
/// thousands.
#[must_use]
pub fn tick_labels(ticks: &[f64]) -> Vec<String> {
    let (Some(&first), Some(&last)) = (ticks.first(), ticks.last()) else {
        return Vec::new();
    };
    let step = tick_step(first, last, 10.0);
    let decimals = if step > 0.0 && step.is_finite() {
        precision(step)
    } else {
        0
    };

    ticks.iter().map(|&t| format_fixed(t, decimals)).collect()
}

const MAX_DECIMALS: usize = 4;

/// Fewest decimals (up to [`MAX_DECIMALS`]) that print `value` exactly.
#[allow(clippy::float_cmp)]
fn exact_decimals(value: f64) -> usize {
    (0..MAX_DECIMALS)
        .find(|&d| {
            format!("{value:.d$}")
                .parse::<f64>()
                .is_ok_and(|parsed| parsed == value)
        })
        .unwrap_or(MAX_DECIMALS)
}

/// Formats breakpoint labels so each one shows the value it marks.
///
/// Each value gets the fewest decimals that print it exactly. Adjacent
/// distinct values that would still print alike fall back to their
/// shortest round-trip form.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn breakpoint_labels(values: &[f64]) -> Vec<String> {
    let mut labels: Vec<String> = values
        .iter()
        .map(|&v| format_fixed(v, exact_decimals(v)))
        .collect();

    let collisions: Vec<usize> = values
        .windows(2)
        .zip(labels.windows(2))
        .enumerate()
        .filter(|(_, (v, l))| v[0] != v[1] && l[0] == l[1])
        .map(|(i, _)| i)
        .collect();
    for i in collisions {
        labels[i] = tidy(&values[i].to_string());
        labels[i + 1] = tidy(&values[i + 1].to_string());
    }

    labels
}

/// Renders `legend` into a standalone `svg` element.
///
/// Swatches share the inner width equally. A tick is drawn at every
/// entry boundary; the label is left out when the boundary repeats the
/// one before it, which happens for a zero-width outer entry.
#[must_use]
pub fn legend_svg(legend: &Legend, layout: &LegendLayout) -> Element {
    let m = layout.margin;
    let inner_width = layout.width - m.left - m.right;
    let inner_height = layout.height - m.top - m.bottom;

    #[allow(clippy::cast_precision_loss)]
    let count = legend.entries.len().max(1) as f64;
    let swatch_width = inner_width / count;

    let mut boxes = Element::new("g").attr("id", "legend-boxes");
    let mut edges = Vec::with_capacity(legend.entries.len() + 1);
    for (i, entry) in legend.entries.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f64 * swatch_width;
        boxes.push(
            Element::new("rect")
                .attr_num("x", x)
                .attr("y", "0")
                .attr_num("width", swatch_width)
                .attr_num("height", inner_height)
                .attr("fill", entry.color.to_string()),
        );
        edges.push((x, entry.start));
    }
    if let Some(last) = legend.entries.last() {
        edges.push((inner_width, last.end));
    }

    let values: Vec<f64> = edges.iter().map(|&(_, v)| v).collect();
    let labels = match legend.format {
        TickFormat::Breakpoints => breakpoint_labels(&values),
        TickFormat::Domain => tick_labels(&values),
    };

    let mut axis = Element::new("g")
        .attr("id", "legend-ticks-labels")
        .attr("transform", format!("translate(0,{})", num(inner_height)))
        .attr("fill", "none")
        .attr("font-size", "10")
        .attr("font-family", "sans-serif")
        .attr("text-anchor", "middle")
        .child(
            Element::new("path")
                .attr("class", "domain")
                .attr("stroke", "currentColor")
                .attr("d", format!("M0.5,{TICK_SIZE}V0.5H{}V{TICK_SIZE}", num(inner_width + 0.5))),
        );

    let mut previous: Option<f64> = None;
    for (&(x, value), label) in edges.iter().zip(&labels) {
        let mut tick = Element::new("g")
            .attr("class", "tick")
            .attr("transform", format!("translate({},0)", num(x + 0.5)))
            .child(
                Element::new("line")
                    .attr("stroke", "currentColor")
                    .attr_num("y2", TICK_SIZE),
            );
        #[allow(clippy::float_cmp)]
        let repeated = previous.is_some_and(|p| p == value);
        if !repeated {
            tick.push(
                Element::new("text")
                    .attr("fill", "currentColor")
                    .attr_num("y", TICK_SIZE + TICK_PADDING)
                    .attr("dy", "0.71em")
                    .text(label.as_str()),
            );
        }
        previous = Some(value);
        axis.push(tick);
    }

    let title = Element::new("text")
        .attr("id", "legend-title")
        .attr("x", "0")
        .attr("y", "-10")
        .attr("style", "font: bold 11px sans-serif")
        .text(legend.title.as_str());

    Element::new("svg")
        .attr_num("width", layout.width)
        .attr_num("height", layout.height)
        .child(
            Element::new("g")
                .attr(
                    "transform",
                    format!("translate({},{})", num(m.left), num(m.top)),
                )
                .child(boxes)
                .child(axis)
                .child(title),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs_map_classify::{Classifier, Extent, ThresholdScale};
    use jobs_map_jobs::map_config;
    use jobs_map_palette::Scheme;

    fn layout() -> LegendLayout {
        map_config().legend
    }

    fn tick_texts(svg: &Element) -> Vec<String> {
        svg.find_by_id("legend-ticks-labels")
            .unwrap()
            .elements()
            .filter(|e| e.get_attr("class") == Some("tick"))
            .filter_map(|tick| tick.elements().find(|e| e.name() == "text"))
            .map(Element::text_content)
            .collect()
    }

    #[test]
    fn tick_labels_use_domain_precision() {
        assert_eq!(
            tick_labels(&[-1.5, -0.1, 0.1, 1.5, 3.2]),
            ["-1.5", "-0.1", "0.1", "1.5", "3.2"]
        );
        assert_eq!(
            tick_labels(&[0.692, 388.232, 969.515, 1831.309, 4198.004, 468_772.256]),
            ["1", "388", "970", "1,831", "4,198", "468,772"]
        );
        assert!(tick_labels(&[]).is_empty());
    }

    #[test]
    fn breakpoint_labels_show_each_value() {
        assert_eq!(
            breakpoint_labels(&[-4.2, -1.5, -0.1, 0.1, 1.5, 6.3]),
            ["-4.2", "-1.5", "-0.1", "0.1", "1.5", "6.3"]
        );
        assert_eq!(breakpoint_labels(&[1234.5, -0.0, 2.0]), ["1,234.5", "0", "2"]);
    }

    #[test]
    fn close_breakpoints_never_share_a_label() {
        assert_eq!(
            breakpoint_labels(&[0.123_456, 0.123_46]),
            ["0.123456", "0.12346"]
        );
    }

    #[test]
    fn negative_zero_label_is_zero() {
        assert_eq!(tick_labels(&[-0.01, 50.0]), ["0", "50"]);
    }

    #[test]
    fn swatches_share_inner_width() {
        let scale =
            ThresholdScale::new(vec![-1.5, -0.1, 0.1, 1.5], Scheme::RdBu.colors().to_vec()).unwrap();
        let legend = Legend::from_classifier(&scale, Some(Extent { min: -2.0, max: 3.2 }), "Change");
        let svg = legend_svg(&legend, &layout());

        let boxes: Vec<&Element> = svg.find_by_id("legend-boxes").unwrap().elements().collect();
        assert_eq!(boxes.len(), 5);
        assert_eq!(boxes[0].get_attr("width"), Some("52"));
        assert_eq!(boxes[0].get_attr("height"), Some("10"));
        assert_eq!(boxes[4].get_attr("x"), Some("208"));
        assert_eq!(boxes[2].get_attr("fill"), Some(scale.swatch(2).to_string().as_str()));

        assert_eq!(tick_texts(&svg), ["-2", "-1.5", "-0.1", "0.1", "1.5", "3.2"]);
        assert_eq!(svg.find_by_id("legend-title").unwrap().text_content(), "Change");
    }

    #[test]
    fn zero_width_edge_label_is_dropped() {
        let scale =
            ThresholdScale::new(vec![-1.5, -0.1, 0.1, 1.5], Scheme::RdBu.colors().to_vec()).unwrap();
        let legend = Legend::from_classifier(&scale, Some(Extent { min: -0.5, max: 0.5 }), "Change");
        let svg = legend_svg(&legend, &layout());

        let ticks = svg
            .find_by_id("legend-ticks-labels")
            .unwrap()
            .elements()
            .filter(|e| e.get_attr("class") == Some("tick"))
            .count();
        assert_eq!(ticks, 6);
        assert_eq!(tick_texts(&svg), ["-1.5", "-0.1", "0.1", "1.5"]);
    }

    #[test]
    fn change_legend_labels_every_breakpoint() {
        let scale =
            ThresholdScale::new(vec![-1.5, -0.1, 0.1, 1.5], Scheme::RdBu.colors().to_vec()).unwrap();
        let legend = Legend::from_classifier(&scale, Some(Extent { min: -4.2, max: 6.3 }), "Change");
        let svg = legend_svg(&legend, &layout());

        assert_eq!(tick_texts(&svg), ["-4.2", "-1.5", "-0.1", "0.1", "1.5", "6.3"]);
    }

    #[test]
    fn level_legend_keeps_break_decimals() {
        let scale =
            ThresholdScale::new(vec![1.1, 2.6, 5.1, 12.3], Scheme::RdBu.colors().to_vec()).unwrap();
        let legend = Legend::from_classifier(&scale, Some(Extent { min: 0.3, max: 12.3 }), "LQ");
        let svg = legend_svg(&legend, &layout());

        assert_eq!(tick_texts(&svg), ["0.3", "1.1", "2.6", "5.1", "12.3"]);
    }

    #[test]
    fn density_legend_uses_domain_precision() {
        let legend = crate::density::density_legend(&map_config().density);
        let svg = legend_svg(&legend, &layout());

        assert_eq!(
            tick_texts(&svg),
            ["1", "388", "970", "1,831", "4,198", "468,772"]
        );
    }
}
