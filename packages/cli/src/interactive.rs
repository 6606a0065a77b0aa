//! Interactive menu for exploring views and exporting them.
//!
//! Every control produces a new [`ViewState`] which is rendered right
//! away; exports write whatever was rendered last.

use std::path::Path;

use dialoguer::Select;
use jobs_map_jobs_models::{Category, DensityFloor, ViewState};
use jobs_map_render::{Export, Session};

/// Actions available in the menu.
enum Action {
    SelectCategory,
    ToggleMode,
    SelectFloor,
    ToggleFrame,
    ExportMap,
    ExportLegend,
    ExportDensity,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::SelectCategory,
        Self::ToggleMode,
        Self::SelectFloor,
        Self::ToggleFrame,
        Self::ExportMap,
        Self::ExportLegend,
        Self::ExportDensity,
        Self::Quit,
    ];

    fn label(&self, view: &ViewState) -> String {
        match self {
            Self::SelectCategory => format!("Select category ({})", view.category.label()),
            Self::ToggleMode => format!("Toggle mode ({})", view.mode.label()),
            Self::SelectFloor => format!("Set density floor ({})", view.floor.value()),
            Self::ToggleFrame => format!(
                "Toggle map frame ({})",
                if view.frame_visible { "shown" } else { "hidden" }
            ),
            Self::ExportMap => format!("Export map ({}.svg)", view.map_export_name()),
            Self::ExportLegend => format!("Export legend ({}.svg)", view.legend_export_name()),
            Self::ExportDensity => "Export job density map and legend".to_string(),
            Self::Quit => "Quit".to_string(),
        }
    }
}

fn select_category(current: Category) -> Result<Category, dialoguer::Error> {
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    let default = Category::ALL.iter().position(|&c| c == current).unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Job category")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(Category::ALL[idx])
}

fn select_floor(current: DensityFloor) -> Result<DensityFloor, Box<dyn std::error::Error>> {
    let labels: Vec<String> = (0..=DensityFloor::MAX)
        .map(|q| format!("Quintile {q} and above"))
        .collect();

    let idx = Select::new()
        .with_prompt("Lowest density quintile at full opacity")
        .items(&labels)
        .default(usize::from(current.value()))
        .interact()?;

    Ok(DensityFloor::new(u8::try_from(idx)?)?)
}

fn write(out: &Path, export: &Export) -> Result<(), Box<dyn std::error::Error>> {
    let path = export.write_to(out)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails, a view cannot be rendered, or an
/// export cannot be written.
pub fn run(session: &mut Session, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ViewState::default();
    session.update(view)?;

    loop {
        let labels: Vec<String> = Action::ALL.iter().map(|a| a.label(&view)).collect();

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let next = match Action::ALL[idx] {
            Action::SelectCategory => view.with_category(select_category(view.category)?),
            Action::ToggleMode => view.toggled_mode(),
            Action::SelectFloor => view.with_floor(select_floor(view.floor)?),
            Action::ToggleFrame => view.with_frame(!view.frame_visible),
            Action::ExportMap => {
                write(out, &session.export_map()?)?;
                continue;
            }
            Action::ExportLegend => {
                write(out, &session.export_legend()?)?;
                continue;
            }
            Action::ExportDensity => {
                write(out, &session.export_density_map())?;
                write(out, &session.export_density_legend())?;
                continue;
            }
            Action::Quit => break,
        };

        if next != view {
            let diff = session.update(next)?;
            log::info!(
                "{} tracts restyled, {} unchanged",
                diff.entered.len() + diff.updated.len(),
                diff.unchanged
            );
            view = next;
        }
    }

    Ok(())
}
