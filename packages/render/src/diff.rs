//! Keyed difference between two tract layers.

use std::collections::BTreeMap;

use crate::choropleth::{RenderedTract, TractLayer};

/// What changed between two renders, keyed by GEOID.
///
/// A GEOID that appears more than once in a layer keeps its last
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerDiff {
    /// GEOIDs only in the new layer.
    pub entered: Vec<String>,
    /// GEOIDs in both layers whose fill, opacity or tooltip changed.
    pub updated: Vec<String>,
    /// GEOIDs only in the previous layer.
    pub exited: Vec<String>,
    /// Number of GEOIDs drawn identically in both layers.
    pub unchanged: usize,
}

fn keyed(layer: &TractLayer) -> BTreeMap<&str, &RenderedTract> {
    layer
        .tracts
        .iter()
        .map(|t| (t.geoid.as_str(), t))
        .collect()
}

impl LayerDiff {
    /// Diffs `next` against `previous`. Without a previous layer every
    /// tract enters.
    #[must_use]
    pub fn between(previous: Option<&TractLayer>, next: &TractLayer) -> Self {
        let before = previous.map(keyed).unwrap_or_default();
        let after = keyed(next);

        let mut diff = Self::default();
        for (geoid, tract) in &after {
            match before.get(geoid) {
                None => diff.entered.push((*geoid).to_string()),
                Some(old) if old != tract => diff.updated.push((*geoid).to_string()),
                Some(_) => diff.unchanged += 1,
            }
        }
        diff.exited = before
            .keys()
            .filter(|geoid| !after.contains_key(*geoid))
            .map(|geoid| (*geoid).to_string())
            .collect();

        diff
    }

    /// Whether nothing entered, changed or exited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs_map_jobs_models::{Mode, ViewState};
    use jobs_map_palette::GREYS;

    fn tract(geoid: &str, opacity: f64) -> RenderedTract {
        RenderedTract {
            geoid: geoid.to_string(),
            d: "M0,0L1,0L1,1Z".into(),
            fill: GREYS[2],
            opacity,
            title: "1".to_string(),
        }
    }

    fn layer(tracts: Vec<RenderedTract>) -> TractLayer {
        TractLayer {
            view: ViewState::default(),
            tracts,
        }
    }

    #[test]
    fn first_render_enters_everything() {
        let next = layer(vec![tract("b", 1.0), tract("a", 1.0)]);
        let diff = LayerDiff::between(None, &next);
        assert_eq!(diff.entered, ["a", "b"]);
        assert!(diff.updated.is_empty() && diff.exited.is_empty());
    }

    #[test]
    fn entered_updated_exited_unchanged() {
        let previous = layer(vec![tract("a", 1.0), tract("b", 1.0), tract("c", 1.0)]);
        let next = layer(vec![tract("a", 1.0), tract("b", 0.2), tract("d", 1.0)]);
        let diff = LayerDiff::between(Some(&previous), &next);

        assert_eq!(diff.entered, ["d"]);
        assert_eq!(diff.updated, ["b"]);
        assert_eq!(diff.exited, ["c"]);
        assert_eq!(diff.unchanged, 1);
        assert!(!diff.is_empty());
    }

    #[test]
    fn duplicate_geoid_last_write_wins() {
        let previous = layer(vec![tract("a", 0.2)]);
        let next = layer(vec![tract("a", 0.2), tract("a", 1.0)]);
        let diff = LayerDiff::between(Some(&previous), &next);
        assert_eq!(diff.updated, ["a"]);
        assert_eq!(next.get("a").unwrap().opacity, 1.0);
    }

    #[test]
    fn view_change_alone_is_empty_diff() {
        let previous = layer(vec![tract("a", 1.0)]);
        let mut next = previous.clone();
        next.view = next.view.with_mode(Mode::Change);
        assert!(LayerDiff::between(Some(&previous), &next).is_empty());
    }
}
