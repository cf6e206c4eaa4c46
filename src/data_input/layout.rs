// src/data_input/layout.rs

//! Rig-specific marker layouts.
//!
//! Exclusion lists, label tables and the file-name switch between the two
//! known rigs are data, not code: they live in [`LayoutProfile`] values that
//! a [`LayoutSelector`] hands to the identifier. New rigs are added by
//! configuration (see `config.rs`) without touching the identification
//! algorithms.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BUILTIN_ROLE_TABLE, CENTER_LINE_EXCLUDED_LABELS, COMPANION_EXCLUDED_INDICES,
    COMPANION_FILE_NAME, COMPANION_FILE_PATTERN, COMPANION_LABEL_SWAP, COMPANION_UNMATCHED_LABEL,
};
use crate::data_input::roles::Role;

/// Numeric marker label -> anatomical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub label: usize,
    pub role: Role,
}

/// Splits markers into left/right around the mean Y line, drops fixed
/// temporary labels, renumbers the rest in index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterLineSplitLayout {
    /// Temporary side labels (`l1`, `r5`, ...) removed before renumbering.
    pub excluded_labels: Vec<String>,
    pub role_table: Vec<RoleAssignment>,
}

/// Drops fixed marker indices, then labels the survivors by greedy nearest
/// match against a companion capture identified with `companion_layout`.
///
/// Rig-specific: the matching and the label swaps were tuned on one pair of
/// recordings and are not a general pose-matching method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionMatchedLayout {
    /// Raw 0-based marker indices removed before matching.
    pub excluded_indices: Vec<usize>,
    /// File name of the companion capture, resolved next to the input file.
    pub companion_file: String,
    pub companion_layout: CenterLineSplitLayout,
    /// Label given to markers left without a companion match.
    pub unmatched_label: usize,
    /// Label pairs swapped after matching when both labels were assigned.
    pub label_swaps: Vec<[usize; 2]>,
    pub role_table: Vec<RoleAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutProfile {
    CenterLineSplit(CenterLineSplitLayout),
    CompanionMatched(CompanionMatchedLayout),
}

impl LayoutProfile {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutProfile::CenterLineSplit(_) => "center-line split",
            LayoutProfile::CompanionMatched(_) => "companion-matched",
        }
    }

    pub fn role_table(&self) -> &[RoleAssignment] {
        match self {
            LayoutProfile::CenterLineSplit(layout) => &layout.role_table,
            LayoutProfile::CompanionMatched(layout) => &layout.role_table,
        }
    }
}

/// Display name of a numeric label: the role tag when the table maps it,
/// otherwise the number itself.
pub fn label_display_name(role_table: &[RoleAssignment], label: usize) -> String {
    role_table
        .iter()
        .find(|entry| entry.label == label)
        .map(|entry| entry.role.tag().to_string())
        .unwrap_or_else(|| label.to_string())
}

pub fn builtin_role_table() -> Vec<RoleAssignment> {
    BUILTIN_ROLE_TABLE
        .iter()
        .filter_map(|&(label, tag)| {
            tag.parse::<Role>()
                .ok()
                .map(|role| RoleAssignment { label, role })
        })
        .collect()
}

impl CenterLineSplitLayout {
    pub fn builtin() -> Self {
        Self {
            excluded_labels: CENTER_LINE_EXCLUDED_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            role_table: builtin_role_table(),
        }
    }
}

impl CompanionMatchedLayout {
    pub fn builtin() -> Self {
        Self {
            excluded_indices: COMPANION_EXCLUDED_INDICES.to_vec(),
            companion_file: COMPANION_FILE_NAME.to_string(),
            companion_layout: CenterLineSplitLayout::builtin(),
            unmatched_label: COMPANION_UNMATCHED_LABEL,
            label_swaps: vec![[COMPANION_LABEL_SWAP.0, COMPANION_LABEL_SWAP.1]],
            role_table: builtin_role_table(),
        }
    }
}

/// A profile applied to files whose name contains `file_name_contains`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRule {
    pub file_name_contains: String,
    pub profile: LayoutProfile,
}

/// Chooses the layout profile for a capture file. Rules are tried in order;
/// the first whose substring occurs in the file name wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSelector {
    #[serde(default)]
    pub rules: Vec<LayoutRule>,
    pub default_profile: LayoutProfile,
}

impl LayoutSelector {
    /// The two rigs the tool was built for: `Measurement2` recordings are
    /// matched against `Measurement1.tsv`, everything else is split on the
    /// center line.
    pub fn builtin() -> Self {
        Self {
            rules: vec![LayoutRule {
                file_name_contains: COMPANION_FILE_PATTERN.to_string(),
                profile: LayoutProfile::CompanionMatched(CompanionMatchedLayout::builtin()),
            }],
            default_profile: LayoutProfile::CenterLineSplit(CenterLineSplitLayout::builtin()),
        }
    }

    pub fn select(&self, path: &Path) -> &LayoutProfile {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.rules
            .iter()
            .find(|rule| file_name.contains(&rule.file_name_contains))
            .map(|rule| &rule.profile)
            .unwrap_or(&self.default_profile)
    }
}

impl Default for LayoutSelector {
    fn default() -> Self {
        Self::builtin()
    }
}
