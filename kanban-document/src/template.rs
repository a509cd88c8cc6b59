//! Column presets for new boards

use crate::context::EngineContext;
use crate::types::{BoardDocument, Column, ColumnId};
use indexmap::IndexMap;

pub const ONE_COLUMN: &str = "1 Column";
pub const STANDARD_3: &str = "Standard 3 columns";
pub const STANDARD_4: &str = "Standard 4 columns";
pub const STANDARD_5: &str = "Standard 5 columns";

/// Every recognized template name, in menu order
pub const TEMPLATE_NAMES: &[&str] = &[ONE_COLUMN, STANDARD_3, STANDARD_4, STANDARD_5];

struct Preset {
    title: &'static str,
    /// Pinned color; `None` picks a random one
    color: Option<&'static str>,
}

const fn pinned(title: &'static str, color: &'static str) -> Preset {
    Preset {
        title,
        color: Some(color),
    }
}

const fn random(title: &'static str) -> Preset {
    Preset { title, color: None }
}

fn presets(name: &str) -> Option<&'static [Preset]> {
    const ONE: &[Preset] = &[random("To Do")];
    const THREE: &[Preset] = &[
        pinned("To Do", "#AF522B"),
        pinned("In Progress", "#23863D"),
        pinned("Done", "#3247D8"),
    ];
    const FOUR: &[Preset] = &[
        pinned("To Do", "#AF522B"),
        pinned("In Progress", "#23863D"),
        pinned("Done", "#3247D8"),
        pinned("On Hold", "#9C0029"),
    ];
    const FIVE: &[Preset] = &[
        random("To Do"),
        random("Selected"),
        random("In Progress"),
        random("Testing"),
        random("Done"),
    ];

    match name {
        ONE_COLUMN => Some(ONE),
        STANDARD_3 => Some(THREE),
        STANDARD_4 => Some(FOUR),
        STANDARD_5 => Some(FIVE),
        _ => None,
    }
}

/// Check whether `name` is a known template
pub fn is_template(name: &str) -> bool {
    presets(name).is_some()
}

/// Column titles of a template, in order
pub fn template_titles(name: &str) -> Option<Vec<&'static str>> {
    presets(name).map(|p| p.iter().map(|preset| preset.title).collect())
}

/// Fresh, empty columns for a template, keyed by new ids in template order.
///
/// Unknown names yield an empty map. Random colors avoid the colors already
/// chosen for earlier columns of the same template.
pub fn create_columns_from_template(name: &str, ctx: &EngineContext) -> IndexMap<ColumnId, Column> {
    let mut columns = IndexMap::new();
    let Some(presets) = presets(name) else {
        return columns;
    };

    for preset in presets {
        let color = match preset.color {
            Some(color) => color.to_string(),
            None => {
                let used: Vec<&str> = columns
                    .values()
                    .map(|c: &Column| c.highlight_color.as_str())
                    .collect();
                ctx.pick_color_avoiding(&used)
            }
        };
        let id = ctx.ids().column_id();
        columns.insert(id.clone(), Column::new(id, preset.title, color));
    }
    columns
}

impl BoardDocument {
    /// A new board pre-populated with a template's columns.
    ///
    /// Unknown names give an empty board.
    pub fn from_template(name: &str, ctx: &EngineContext) -> Self {
        let columns = create_columns_from_template(name, ctx);
        Self {
            column_order: columns.keys().cloned().collect(),
            columns,
            ..Self::default()
        }
    }
}
