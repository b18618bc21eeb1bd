//! Per-cell mechanical parameters.  Strengths are in µm/min.

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MechanicsParams {
    pub cell_cell_adhesion_strength:  f64,
    pub cell_bm_adhesion_strength:    f64,
    pub cell_cell_repulsion_strength: f64,
    pub cell_bm_repulsion_strength:   f64,
    /// Adhesion reaches out to this multiple of the radius.
    pub relative_maximum_adhesion_distance: f64,
    pub maximum_number_of_attachments:      usize,
    /// Spring constant of an attachment, in 1/min.
    pub attachment_elastic_constant:        f64,
}

impl Default for MechanicsParams {
    fn default() -> Self {
        Self {
            cell_cell_adhesion_strength:        0.4,
            cell_bm_adhesion_strength:          4.0,
            cell_cell_repulsion_strength:       10.0,
            cell_bm_repulsion_strength:         100.0,
            relative_maximum_adhesion_distance: 1.25,
            maximum_number_of_attachments:      12,
            attachment_elastic_constant:        0.01,
        }
    }
}
