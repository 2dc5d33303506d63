//! Test double for the render collaborator.

use std::collections::{HashMap, HashSet};

use crate::domain::Marker;
use crate::engine::render::{
    ChartBackend, MarkerHandle, PaneIndex, RenderError, SeriesData, SeriesHandle, SeriesShape,
    StyleOptions,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        handle: SeriesHandle,
        shape: SeriesShape,
        pane: PaneIndex,
        style: StyleOptions,
    },
    SetData {
        handle: SeriesHandle,
        len: usize,
    },
    ApplyOptions {
        handle: SeriesHandle,
        style: StyleOptions,
    },
    Remove(SeriesHandle),
    PaneHeight(PaneIndex, f32),
    CreateMarkers {
        series: SeriesHandle,
        handle: MarkerHandle,
        markers: Vec<Marker>,
    },
    SetMarkers {
        handle: MarkerHandle,
        markers: Vec<Marker>,
    },
    DisableAutoScale,
}

/// Records every call and keeps just enough state to reject stale handles.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    next_id: u64,
    live: HashMap<SeriesHandle, SeriesShape>,
    marker_sets: HashMap<MarkerHandle, SeriesHandle>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_calls(&mut self) {
        self.calls.clear();
    }

    pub fn live_handles(&self) -> HashSet<SeriesHandle> {
        self.live.keys().copied().collect()
    }

    pub fn create_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Create { .. }))
    }

    pub fn remove_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Remove(_)))
    }

    pub fn remove_count_for(&self, handle: SeriesHandle) -> usize {
        self.count(|c| *c == Call::Remove(handle))
    }

    pub fn set_data_count(&self) -> usize {
        self.count(|c| matches!(c, Call::SetData { .. }))
    }

    pub fn set_data_count_for(&self, handle: SeriesHandle) -> usize {
        self.count(|c| matches!(c, Call::SetData { handle: h, .. } if *h == handle))
    }

    pub fn apply_options_count(&self) -> usize {
        self.count(|c| matches!(c, Call::ApplyOptions { .. }))
    }

    pub fn apply_options_for(&self, handle: SeriesHandle) -> Vec<&StyleOptions> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ApplyOptions { handle: h, style } if *h == handle => Some(style),
                _ => None,
            })
            .collect()
    }

    pub fn created_style(&self, handle: SeriesHandle) -> Option<&StyleOptions> {
        self.calls.iter().find_map(|c| match c {
            Call::Create { handle: h, style, .. } if *h == handle => Some(style),
            _ => None,
        })
    }

    pub fn disable_auto_scale_count(&self) -> usize {
        self.count(|c| *c == Call::DisableAutoScale)
    }

    pub fn last_pane_height(&self, pane: PaneIndex) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::PaneHeight(p, px) if *p == pane => Some(*px),
            _ => None,
        })
    }

    /// Markers most recently handed over for `series`, if any set exists.
    pub fn markers_for(&self, series: SeriesHandle) -> Option<Vec<Marker>> {
        let marker_handle = self
            .marker_sets
            .iter()
            .find_map(|(m, s)| (*s == series).then_some(*m))?;
        self.calls.iter().rev().find_map(|c| match c {
            Call::SetMarkers { handle, markers } if *handle == marker_handle => Some(markers.clone()),
            Call::CreateMarkers { handle, markers, .. } if *handle == marker_handle => {
                Some(markers.clone())
            }
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl ChartBackend for RecordingBackend {
    fn create_series(&mut self, shape: SeriesShape, style: &StyleOptions, pane: PaneIndex) -> SeriesHandle {
        let handle = SeriesHandle(self.next_id());
        self.live.insert(handle, shape);
        self.calls.push(Call::Create {
            handle,
            shape,
            pane,
            style: style.clone(),
        });
        handle
    }

    fn set_data(&mut self, handle: SeriesHandle, data: SeriesData) -> Result<(), RenderError> {
        let shape = *self.live.get(&handle).ok_or(RenderError::UnknownSeries(handle))?;
        if !data.fits(shape) {
            return Err(RenderError::ShapeMismatch { handle, shape });
        }
        self.calls.push(Call::SetData {
            handle,
            len: data.len(),
        });
        Ok(())
    }

    fn apply_options(&mut self, handle: SeriesHandle, style: &StyleOptions) -> Result<(), RenderError> {
        if !self.live.contains_key(&handle) {
            return Err(RenderError::UnknownSeries(handle));
        }
        self.calls.push(Call::ApplyOptions {
            handle,
            style: style.clone(),
        });
        Ok(())
    }

    fn remove_series(&mut self, handle: SeriesHandle) -> Result<(), RenderError> {
        if self.live.remove(&handle).is_none() {
            return Err(RenderError::UnknownSeries(handle));
        }
        self.marker_sets.retain(|_, series| *series != handle);
        self.calls.push(Call::Remove(handle));
        Ok(())
    }

    fn set_pane_height(&mut self, pane: PaneIndex, height_px: f32) {
        self.calls.push(Call::PaneHeight(pane, height_px));
    }

    fn create_markers(&mut self, series: SeriesHandle, markers: Vec<Marker>) -> Result<MarkerHandle, RenderError> {
        if !self.live.contains_key(&series) {
            return Err(RenderError::UnknownSeries(series));
        }
        let handle = MarkerHandle(self.next_id());
        self.marker_sets.insert(handle, series);
        self.calls.push(Call::CreateMarkers {
            series,
            handle,
            markers,
        });
        Ok(handle)
    }

    fn set_markers(&mut self, handle: MarkerHandle, markers: Vec<Marker>) -> Result<(), RenderError> {
        if !self.marker_sets.contains_key(&handle) {
            return Err(RenderError::UnknownMarkers(handle));
        }
        self.calls.push(Call::SetMarkers { handle, markers });
        Ok(())
    }

    fn disable_auto_scale(&mut self) {
        self.calls.push(Call::DisableAutoScale);
    }
}
