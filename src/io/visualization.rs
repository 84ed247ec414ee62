//! Animated GIF replay of the layout event journal

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use image::{Frame, Rgba, RgbaImage};

use crate::algorithm::executor::{Layout, LayoutEvent};
use crate::io::configuration::{
    EMPTY_COLOR, FORBIDDEN_COLOR, PATH_COLOR, TERRAIN_COLOR, VIEWER_MIN_FRAME_DELAY_MS,
};
use crate::io::error::{LayoutError, Result, computation_error};
use crate::spatial::bounds::ChunkBounds;
use crate::spatial::chunk::ChunkId;
use crate::spatial::coordinate::Coordinate;
use crate::spatial::grid::BoundingBox;

#[derive(Debug, Clone)]
struct ChunkSnapshot {
    position: Coordinate,
    primary: Vec<Coordinate>,
    secondary: Vec<Coordinate>,
}

/// Replays layout events frame by frame
///
/// Every event yields one frame showing the chunks present after it.
pub struct VisualizationCapture {
    bounds: ChunkBounds,
    events: Vec<LayoutEvent>,
}

impl VisualizationCapture {
    /// Capture the journal of a finished layout
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            bounds: *layout.bounds(),
            events: layout.events().to_vec(),
        }
    }

    /// Number of recorded events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Export the replay as a GIF with automatic frame skipping
    ///
    /// Frames are skipped when the requested delay is below what viewers
    /// reliably display, keeping the apparent animation speed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No events were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.events.is_empty() {
            return Err(computation_error(
                "gif export",
                &"no layout events captured for visualization",
            ));
        }

        let delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(delay_ms) as usize
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LayoutError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| LayoutError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| LayoutError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Chunk-grid extent of every position any event touched
    fn extent(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.events.iter().filter_map(|event| match event {
            LayoutEvent::ChunkPlaced { position, .. }
            | LayoutEvent::ChunkRegenerated { position, .. }
            | LayoutEvent::ChunkRemoved { position, .. }
            | LayoutEvent::PositionForbidden { position } => Some(*position),
            LayoutEvent::SecondaryPathAdded { .. } | LayoutEvent::ExitDropped { .. } => None,
        }))
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Result<Vec<Frame>> {
        let extent = self
            .extent()
            .ok_or_else(|| computation_error("gif export", &"no chunk positions in journal"))?;

        let mut chunks: BTreeMap<ChunkId, ChunkSnapshot> = BTreeMap::new();
        let mut forbidden: HashSet<Coordinate> = HashSet::new();
        let mut frames = Vec::new();

        for (index, event) in self.events.iter().enumerate() {
            apply_event(&mut chunks, &mut forbidden, event);
            if (index + 1) % skip_factor == 0 {
                frames.push(self.render_frame(&extent, &chunks, &forbidden, delay_ms));
            }
        }

        if self.events.len() % skip_factor != 0 {
            frames.push(self.render_frame(&extent, &chunks, &forbidden, delay_ms));
        }

        // Final frame displays longer for better visibility
        if let Some(last_frame_img) = frames.last().map(|f| f.buffer().clone()) {
            frames.push(Frame::from_parts(
                last_frame_img,
                0,
                0,
                image::Delay::from_numer_denom_ms(delay_ms * 25, 1),
            ));
        }

        Ok(frames)
    }

    fn render_frame(
        &self,
        extent: &BoundingBox,
        chunks: &BTreeMap<ChunkId, ChunkSnapshot>,
        forbidden: &HashSet<Coordinate>,
        delay_ms: u32,
    ) -> Frame {
        let width = self.bounds.width as u32;
        let height = self.bounds.height as u32;
        let mut img = RgbaImage::from_pixel(
            extent.width() as u32 * width,
            extent.height() as u32 * height,
            Rgba(EMPTY_COLOR),
        );

        let occupied: HashSet<Coordinate> = chunks.values().map(|c| c.position).collect();
        for &position in forbidden.difference(&occupied) {
            for cell in self.bounds.cells() {
                self.put_cell(&mut img, extent, position, cell, FORBIDDEN_COLOR);
            }
        }

        for snapshot in chunks.values() {
            let path: HashSet<Coordinate> = snapshot
                .primary
                .iter()
                .chain(&snapshot.secondary)
                .copied()
                .collect();
            for cell in self.bounds.cells() {
                let color = if path.contains(&cell) {
                    PATH_COLOR
                } else {
                    TERRAIN_COLOR
                };
                self.put_cell(&mut img, extent, snapshot.position, cell, color);
            }
        }

        Frame::from_parts(img, 0, 0, image::Delay::from_numer_denom_ms(delay_ms, 1))
    }

    fn put_cell(
        &self,
        img: &mut RgbaImage,
        extent: &BoundingBox,
        position: Coordinate,
        cell: Coordinate,
        color: [u8; 4],
    ) {
        // Chunk-grid rows grow downward while y grows upward
        let chunk_col = (position.x - extent.min.x) as u32;
        let chunk_row = (extent.max.y - position.y) as u32;
        let col = chunk_col * self.bounds.width as u32 + (cell.x - self.bounds.x.min) as u32;
        let row = chunk_row * self.bounds.height as u32 + (self.bounds.y.max - cell.y) as u32;
        if col < img.width() && row < img.height() {
            img.put_pixel(col, row, Rgba(color));
        }
    }
}

fn apply_event(
    chunks: &mut BTreeMap<ChunkId, ChunkSnapshot>,
    forbidden: &mut HashSet<Coordinate>,
    event: &LayoutEvent,
) {
    match event {
        LayoutEvent::ChunkPlaced {
            chunk,
            position,
            cells,
        } => {
            chunks.insert(
                *chunk,
                ChunkSnapshot {
                    position: *position,
                    primary: cells.clone(),
                    secondary: Vec::new(),
                },
            );
        }
        LayoutEvent::SecondaryPathAdded { chunk, cells } => {
            if let Some(snapshot) = chunks.get_mut(chunk) {
                snapshot.secondary.clone_from(cells);
            }
        }
        LayoutEvent::ChunkRegenerated { chunk, cells, .. } => {
            if let Some(snapshot) = chunks.get_mut(chunk) {
                snapshot.primary.clone_from(cells);
                snapshot.secondary.clear();
            }
        }
        LayoutEvent::ChunkRemoved { chunk, .. } => {
            chunks.remove(chunk);
        }
        LayoutEvent::PositionForbidden { position } => {
            forbidden.insert(*position);
        }
        LayoutEvent::ExitDropped { .. } => {}
    }
}
