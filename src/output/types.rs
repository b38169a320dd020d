//! Output type definitions.

/// Accuracy of one predicted mask against its ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// Row index within the species' records.
    pub index: usize,
    /// Mean IoU over background and foreground.
    pub iou: f64,
    /// Foreground precision.
    pub precision: f64,
    /// Foreground recall.
    pub recall: f64,
    /// File name of the predicted mask.
    pub plot: String,
    /// Species display name.
    pub species: String,
    /// Flight height of the predicted tile.
    pub height: String,
}
