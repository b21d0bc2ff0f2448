//! Row-major grid packing for dashboard widgets.
//!
//! Widgets are placed left to right on a fixed-width grid. A widget wider
//! than the space left in the current row starts a new row; a widget wider
//! than the whole grid is an error.

use crate::error::CoreError;
use crate::widget::{WidgetConfig, WidgetPosition};

/// Cursor over a grid of `columns` columns.
#[derive(Debug, Clone)]
pub struct GridPacker {
    columns: u32,
    row: u32,
    col: u32,
}

impl GridPacker {
    pub fn new(columns: u32) -> Self {
        Self {
            columns,
            row: 0,
            col: 0,
        }
    }

    /// Reserve `span` columns and return the assigned position.
    pub fn place(&mut self, span: u32) -> Result<WidgetPosition, CoreError> {
        if span == 0 || span > self.columns {
            return Err(CoreError::Validation(format!(
                "Widget span {span} does not fit a {}-column grid",
                self.columns
            )));
        }
        if span > self.columns - self.col {
            self.row += 1;
            self.col = 0;
        }

        let position = WidgetPosition::new(self.row, self.col, span);
        self.col += span;
        if self.col >= self.columns {
            self.col = 0;
            self.row += 1;
        }
        Ok(position)
    }
}

/// Reassign positions to `widgets` in list order, keeping each span.
pub fn pack_widgets(
    widgets: Vec<WidgetConfig>,
    columns: u32,
) -> Result<Vec<WidgetConfig>, CoreError> {
    let mut packer = GridPacker::new(columns);
    widgets
        .into_iter()
        .map(|mut widget| {
            widget.position = packer.place(widget.position.span)?;
            Ok(widget)
        })
        .collect()
}
