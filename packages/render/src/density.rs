//! Job density map: tracts filled by their density quintile.

use jobs_map_classify::Legend;
use jobs_map_jobs_models::config::DensityConfig;
use jobs_map_palette::{Color, NO_DATA, Scheme};

use crate::choropleth::{NO_DATA_TITLE, TractBoundaries, TractShape};
use crate::svg::Element;

/// Artifact name of the density map export.
pub const DENSITY_MAP_NAME: &str = "job-density-map";

/// Artifact name of the density legend export.
pub const DENSITY_LEGEND_NAME: &str = "job-density-legend";

/// Title of the density legend.
pub const DENSITY_LEGEND_TITLE: &str = "Number of jobs per square mile";

/// Fill for a tract in `quintile`.
#[must_use]
pub fn density_fill(scheme: Scheme, quintile: Option<u8>) -> Color {
    quintile
        .and_then(|q| scheme.colors().get(usize::from(q)))
        .copied()
        .unwrap_or(NO_DATA)
}

/// The `tracts` group of the density map.
#[must_use]
pub fn density_group(
    shapes: &[TractShape],
    config: &DensityConfig,
    boundaries: Option<&TractBoundaries>,
) -> Element {
    let mut group = Element::new("g").attr("id", "tracts");
    for shape in shapes.iter().filter(|s| !s.path.is_empty()) {
        let title = shape
            .tract
            .quintile
            .map_or_else(|| NO_DATA_TITLE.to_string(), |q| q.to_string());
        group.push(
            Element::new("path")
                .attr("class", "tract-poly")
                .attr("data-geoid", shape.tract.geoid.as_str())
                .attr("d", &*shape.path)
                .attr("fill", density_fill(config.scheme, shape.tract.quintile).to_string())
                .attr("fill-rule", "evenodd")
                .child(Element::new("title").text(title)),
        );
    }
    if let Some(boundaries) = boundaries {
        group.push(boundaries.mesh_path(0.05));
    }
    group
}

/// Legend of the fixed quintile ranges.
#[must_use]
pub fn density_legend(config: &DensityConfig) -> Legend {
    let ranges: Vec<(f64, f64)> = config.quintiles.iter().map(|&[a, b]| (a, b)).collect();
    Legend::from_ranges(&ranges, config.scheme.colors(), DENSITY_LEGEND_TITLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choropleth::tests::shapes;
    use jobs_map_jobs::map_config;

    #[test]
    fn fill_by_quintile() {
        let colors = Scheme::GnBu.colors();
        assert_eq!(density_fill(Scheme::GnBu, Some(0)), colors[0]);
        assert_eq!(density_fill(Scheme::GnBu, Some(4)), colors[4]);
        assert_eq!(density_fill(Scheme::GnBu, Some(5)), NO_DATA);
        assert_eq!(density_fill(Scheme::GnBu, None), NO_DATA);
    }

    #[test]
    fn group_draws_tracts_with_geometry() {
        let config = map_config().density;
        let group = density_group(&shapes(), &config, None);
        let paths: Vec<&Element> = group.elements().collect();

        assert_eq!(paths.len(), 2);
        assert_eq!(
            paths[0].get_attr("fill"),
            Some(config.scheme.colors()[4].to_string().as_str())
        );
        assert_eq!(paths[1].elements().next().unwrap().text_content(), "0");
    }

    #[test]
    fn legend_uses_configured_ranges() {
        let legend = density_legend(&map_config().density);
        assert_eq!(legend.entries.len(), 5);
        assert_eq!(legend.title, DENSITY_LEGEND_TITLE);
        assert_eq!(legend.ticks().first(), Some(&0.692));
        assert_eq!(legend.ticks().last(), Some(&468_772.256));
        assert_eq!(legend.breaks(), [388.232, 969.515, 1831.309, 4198.004]);
    }
}
