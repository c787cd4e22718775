//! The document: strokes plus everything needed to edit them.

use std::collections::HashSet;

use kurbo::{Point, Rect, Size};

use crate::bounds::{ApproxTextMeasure, Bounds, TextMeasure, stroke_bounds, union_bounds};
use crate::camera::{Camera, ZOOM_STEP};
use crate::history::History;
use crate::hit::{HandleKind, handle_positions, hit_handle, hit_stroke, strokes_in_rect};
use crate::input::{Key, Modifiers, MouseButton, PointerEvent};
use crate::recognize::classify_drawing;
use crate::render::{CursorHint, RenderItem, Scene};
use crate::selection::Selection;
use crate::settings::Settings;
use crate::shapes::{Geometry, Rgb, Stroke, StrokeId, TextBlock, TextStyle};
use crate::tools::{ToolKind, ToolManager, ToolState};
use crate::transform::TransformEngine;

/// New text is placed so the first baseline sits this many font sizes below
/// the click point.
pub const TEXT_BASELINE_OFFSET: f64 = 0.8;

/// What a text-entry overlay is editing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEdit {
    New,
    Existing { id: StrokeId, text: String },
}

/// Request for the host to open a text-entry overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    /// World position the overlay should appear at.
    pub world_anchor: Point,
    pub edit: TextEdit,
    pub style: TextStyle,
    pub color: Rgb,
}

/// Result of feeding a pointer event to the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerResponse {
    pub cursor: CursorHint,
    /// Set when the text tool wants an entry overlay opened.
    pub text_entry: Option<TextEntry>,
}

impl PointerResponse {
    fn cursor(cursor: CursorHint) -> Self {
        Self { cursor, text_entry: None }
    }
}

/// A drawing document and its editing state.
pub struct Document {
    strokes: Vec<Stroke>,
    selection: Selection,
    pub camera: Camera,
    history: History,
    transform: TransformEngine,
    tools: ToolManager,
    pub settings: Settings,
    locked: bool,
    viewport: Size,
    measure: Box<dyn TextMeasure>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("strokes", &self.strokes.len())
            .field("selection", &self.selection)
            .field("camera", &self.camera)
            .field("tool", &self.tools.current_tool)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Document {
    pub fn new(settings: Settings) -> Self {
        Self {
            strokes: Vec::new(),
            selection: Selection::new(),
            camera: Camera::new(),
            history: History::new(),
            transform: TransformEngine::new(),
            tools: ToolManager::new(),
            settings,
            locked: false,
            viewport: Size::new(800.0, 600.0),
            measure: Box::new(ApproxTextMeasure),
        }
    }

    /// Use the renderer's text measurement for bounds and hit testing.
    pub fn with_text_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_dragging(&self) -> bool {
        self.transform.is_dragging()
    }

    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
    }

    /// Switch tools, dropping the selection. Ignored while the canvas is locked.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.locked {
            return;
        }
        self.tools.set_tool(tool);
        self.transform.reset();
        self.selection.clear();
    }

    /// While locked only panning and zooming work.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.transform.end();
            if !matches!(self.tools.state, ToolState::Panning { .. }) {
                self.tools.cancel();
            }
        }
    }

    /// Append a stroke on top, recording an undo point.
    pub fn add_stroke(&mut self, stroke: Stroke) -> usize {
        self.history.snapshot(&self.strokes);
        self.strokes.push(stroke);
        self.strokes.len() - 1
    }

    /// Remove the stroke at `index`, keeping the selection consistent.
    fn remove_at(&mut self, index: usize) -> Stroke {
        let stroke = self.strokes.remove(index);
        self.selection.remove_index(index);
        self.transform.reset();
        stroke
    }

    /// Turn a finished trace into a stroke for the current tool.
    ///
    /// Returns the new stroke's index, or `None` if the trace was rejected.
    pub fn complete_drawing(&mut self, points: &[Point]) -> Option<usize> {
        let tool = self.tools.current_tool;
        let Some(geometry) = classify_drawing(points, tool, &self.settings) else {
            log::debug!("No stroke produced by {tool:?} from {} points", points.len());
            return None;
        };
        let width = match geometry {
            Geometry::Brush(_) => self.settings.brush_width,
            _ => self.settings.stroke_width,
        };
        let stroke = Stroke::new(geometry).with_color(self.settings.color).with_stroke_width(width);
        log::debug!("Adding {:?} stroke", stroke.kind());
        Some(self.add_stroke(stroke))
    }

    /// Remove the topmost stroke under `world`.
    pub fn erase_at(&mut self, world: Point) -> Option<Stroke> {
        let hit = hit_stroke(&self.strokes, world, self.measure.as_ref())?;
        self.history.snapshot(&self.strokes);
        Some(self.remove_at(hit))
    }

    /// Select the topmost stroke under `world`, or clear the selection.
    pub fn select_at(&mut self, world: Point) -> Option<usize> {
        match hit_stroke(&self.strokes, world, self.measure.as_ref()) {
            Some(hit) => {
                self.selection.select_only(hit);
                Some(hit)
            }
            None => {
                self.selection.clear();
                None
            }
        }
    }

    /// Select every stroke whose bounds overlap `rect`; the first becomes the target.
    pub fn select_in_rect(&mut self, rect: Rect) -> usize {
        let hits = strokes_in_rect(&self.strokes, rect, self.measure.as_ref());
        let count = hits.len();
        self.selection.set(hits);
        count
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Combined bounds of the strokes a gesture would act on.
    pub fn selection_bounds(&self) -> Option<Bounds> {
        let active = self.selection.active_indices();
        union_bounds(active.iter().filter_map(|&i| self.strokes.get(i)), self.measure.as_ref())
    }

    /// Combined bounds of every stroke.
    pub fn extents(&self) -> Option<Bounds> {
        union_bounds(&self.strokes, self.measure.as_ref())
    }

    /// Delete the selected strokes and the target. Only acts with the move
    /// tool, a target, and no gesture in progress.
    pub fn delete_selected(&mut self) -> usize {
        if self.tools.current_tool != ToolKind::Move || self.transform.is_dragging() || self.tools.is_active() {
            return 0;
        }
        if self.selection.target().is_none() {
            return 0;
        }
        let mut doomed: Vec<usize> = self.selection.indices().to_vec();
        doomed.extend(self.selection.target());
        doomed.retain(|&i| i < self.strokes.len());
        doomed.sort_unstable();
        doomed.dedup();
        if doomed.is_empty() {
            return 0;
        }

        self.history.snapshot(&self.strokes);
        for &index in doomed.iter().rev() {
            self.strokes.remove(index);
        }
        self.selection.clear();
        self.transform.reset();
        log::debug!("Deleted {} strokes", doomed.len());
        doomed.len()
    }

    /// Open text entry at `world`: edit the text stroke under it, or start new text.
    pub fn begin_text_at(&self, world: Point) -> TextEntry {
        let existing = hit_stroke(&self.strokes, world, self.measure.as_ref())
            .and_then(|i| self.strokes.get(i))
            .and_then(|stroke| stroke.as_text().map(|text| (stroke, text)));

        match existing {
            Some((stroke, text)) => TextEntry {
                world_anchor: world,
                edit: TextEdit::Existing { id: stroke.id, text: text.text.clone() },
                style: text.style,
                color: stroke.color,
            },
            None => TextEntry {
                world_anchor: world,
                edit: TextEdit::New,
                style: self.settings.text_style,
                color: self.settings.color,
            },
        }
    }

    /// Apply the result of a text-entry overlay. Blank text creates nothing
    /// and deletes an edited stroke. Returns whether the document changed.
    pub fn commit_text(&mut self, entry: &TextEntry, text: &str) -> bool {
        let blank = text.trim().is_empty();
        match &entry.edit {
            TextEdit::New => {
                if blank {
                    return false;
                }
                let anchor = Point::new(
                    entry.world_anchor.x,
                    entry.world_anchor.y + entry.style.size * TEXT_BASELINE_OFFSET,
                );
                let block = TextBlock::new(anchor, text.to_string()).with_style(entry.style);
                self.add_stroke(Stroke::text(block).with_color(entry.color));
                true
            }
            TextEdit::Existing { id, .. } => {
                let Some(index) = self.strokes.iter().position(|s| s.id == *id) else {
                    log::warn!("Text stroke {id} no longer exists");
                    return false;
                };
                self.history.snapshot(&self.strokes);
                if blank {
                    self.remove_at(index);
                } else if let Geometry::Text(block) = &mut self.strokes[index].geometry {
                    block.text = text.to_string();
                }
                true
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        let (ids, target) = self.selection.ids(&self.strokes);
        if !self.history.undo(&mut self.strokes) {
            return false;
        }
        self.after_replace(&ids, target);
        log::debug!("Undo ({} states left)", self.history.undo_len());
        true
    }

    pub fn redo(&mut self) -> bool {
        let (ids, target) = self.selection.ids(&self.strokes);
        if !self.history.redo(&mut self.strokes) {
            return false;
        }
        self.after_replace(&ids, target);
        log::debug!("Redo ({} states left)", self.history.redo_len());
        true
    }

    fn after_replace(&mut self, ids: &[StrokeId], target: Option<StrokeId>) {
        self.selection.rederive(&self.strokes, ids, target);
        self.transform.reset();
        if !matches!(self.tools.state, ToolState::Panning { .. }) {
            self.tools.cancel();
        }
    }

    /// Replace all strokes, e.g. after loading. History and selection are reset.
    pub fn load_strokes(&mut self, mut strokes: Vec<Stroke>) {
        ensure_unique_ids(&mut strokes);
        self.strokes = strokes;
        self.history.clear();
        self.selection.clear();
        self.transform.reset();
        self.tools.cancel();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.strokes)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let strokes: Vec<Stroke> = serde_json::from_str(json)?;
        let mut document = Self::default();
        document.load_strokes(strokes);
        Ok(document)
    }

    /// Zoom by `delta`, keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, delta: f64) {
        self.camera.zoom_at(anchor, delta);
    }

    /// Zoom in (`steps > 0`) or out around the viewport centre.
    pub fn zoom_step(&mut self, steps: i32) {
        let center = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.camera.zoom_at(center, ZOOM_STEP * steps as f64);
    }

    pub fn pan(&mut self, delta: kurbo::Vec2) {
        self.camera.pan(delta);
    }

    /// Keyboard shortcuts: command+Z undoes, command+X redoes, Delete and
    /// Backspace delete the selection. Returns whether the key was handled.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        match Key::from_name(key) {
            Some(Key::Character('z')) if modifiers.command() => self.undo(),
            Some(Key::Character('x')) if modifiers.command() => self.redo(),
            Some(Key::Delete | Key::Backspace) => self.delete_selected() > 0,
            _ => false,
        }
    }

    /// Feed a pointer event from the input adapter.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Scroll { position, delta } => {
                self.camera.zoom_wheel(position, delta.y);
                PointerResponse::default()
            }
        }
    }

    fn pointer_down(&mut self, screen: Point, button: MouseButton) -> PointerResponse {
        let tool = self.tools.current_tool;
        let wants_pan = tool == ToolKind::Hand || button == MouseButton::Middle;

        if self.locked {
            if wants_pan {
                self.tools.begin_pan(screen);
                return PointerResponse::cursor(CursorHint::Grab);
            }
            return PointerResponse::default();
        }

        let world = self.camera.screen_to_world(screen);

        if tool == ToolKind::Text {
            return PointerResponse { cursor: CursorHint::Default, text_entry: Some(self.begin_text_at(world)) };
        }

        if wants_pan {
            self.tools.begin_pan(screen);
            return PointerResponse::cursor(CursorHint::Grab);
        }

        if let Some(target) = self.selection.target() {
            if let Some(stroke) = self.strokes.get(target) {
                if let Some(handle) = hit_handle(stroke, world, self.measure.as_ref()) {
                    self.history.snapshot(&self.strokes);
                    self.transform.begin_handle(target, stroke, handle, world, self.measure.as_ref());
                    return PointerResponse::cursor(cursor_for_handle(handle));
                }
            }
        }

        match tool {
            ToolKind::Move => {
                if let Some(hit) = hit_stroke(&self.strokes, world, self.measure.as_ref()) {
                    self.history.snapshot(&self.strokes);
                    if self.selection.contains(hit) {
                        self.selection.set_target(hit);
                    } else {
                        self.selection.select_only(hit);
                    }
                    self.transform.begin_move(hit, world);
                } else {
                    self.selection.clear();
                    self.tools.begin_marquee(world);
                }
            }
            ToolKind::Eraser => {
                self.erase_at(world);
            }
            tool if tool.is_drawing_tool() => self.tools.begin_drawing(world),
            _ => {}
        }
        PointerResponse::default()
    }

    fn pointer_move(&mut self, screen: Point) -> PointerResponse {
        if let ToolState::Panning { last } = &mut self.tools.state {
            let delta = screen - *last;
            *last = screen;
            self.camera.pan(delta);
            return PointerResponse::cursor(CursorHint::Grab);
        }
        if self.locked {
            return PointerResponse::default();
        }

        let world = self.camera.screen_to_world(screen);

        if self.transform.is_dragging() {
            let indices = self.selection.active_indices();
            self.transform.update(world, &mut self.strokes, &indices);
            return PointerResponse::default();
        }

        self.tools.update(world);

        let cursor = match self.selection.target().and_then(|t| self.strokes.get(t)) {
            Some(stroke) if self.tools.current_tool == ToolKind::Move => {
                hit_handle(stroke, world, self.measure.as_ref()).map_or(CursorHint::Default, cursor_for_handle)
            }
            _ => CursorHint::Default,
        };
        PointerResponse::cursor(cursor)
    }

    fn pointer_up(&mut self) -> PointerResponse {
        match self.tools.state {
            ToolState::Panning { .. } => {
                self.tools.cancel();
                return PointerResponse::default();
            }
            _ if self.locked => return PointerResponse::default(),
            ToolState::Marquee { .. } => {
                if let Some(rect) = self.tools.finish_marquee() {
                    self.select_in_rect(rect);
                }
                return PointerResponse::default();
            }
            _ => {}
        }

        self.transform.end();
        if let Some(points) = self.tools.finish_drawing() {
            self.complete_drawing(&points);
        }
        PointerResponse::default()
    }

    /// Strokes in draw order with their transforms.
    pub fn render_list(&self) -> Vec<RenderItem<'_>> {
        self.strokes
            .iter()
            .enumerate()
            .map(|(index, stroke)| RenderItem {
                index,
                id: stroke.id,
                kind: stroke.kind(),
                geometry: &stroke.geometry,
                color: stroke.color,
                stroke_width: stroke.stroke_width,
                rotation: stroke.rotation,
                scale: stroke.render_scale(),
                bounds: stroke_bounds(stroke, self.measure.as_ref()),
                is_selected: self.selection.contains(index),
            })
            .collect()
    }

    /// Everything the renderer needs for one frame.
    pub fn scene(&self) -> Scene<'_> {
        let handles = match self.selection.target().and_then(|t| self.strokes.get(t)) {
            Some(stroke) if self.tools.current_tool == ToolKind::Move => {
                handle_positions(stroke, self.measure.as_ref())
            }
            _ => Vec::new(),
        };
        Scene {
            items: self.render_list(),
            handles,
            preview: self.tools.drawing_points(),
            preview_color: self.settings.color,
            marquee: self.tools.marquee_rect(),
        }
    }
}

/// Selection and history track strokes by id, so a loaded document must not
/// repeat one.
fn ensure_unique_ids(strokes: &mut [Stroke]) {
    let mut seen = HashSet::with_capacity(strokes.len());
    for stroke in strokes.iter_mut() {
        if !seen.insert(stroke.id) {
            log::warn!("Stroke id {} is repeated; assigning a new one", stroke.id);
            stroke.regenerate_id();
            seen.insert(stroke.id);
        }
    }
}

fn cursor_for_handle(handle: HandleKind) -> CursorHint {
    match handle {
        HandleKind::Rotate => CursorHint::Grab,
        HandleKind::Corner(_) | HandleKind::Edge(_) => CursorHint::Resize,
    }
}
