//! Separated-layout calculator.
//!
//! Turns a [`LayoutRequest`] into a [`LayoutPlan`]: grid shapes for both
//! sides, card size, gaps, margins, card positions and content sizes.
//!
//! Layout happens in two steps that share one [`SizedLayout`]:
//! 1. [`LayoutCalculator::calculate_optimal_card_size`] solves card size and
//!    gaps for the available area.
//! 2. [`LayoutCalculator::calculate_positions`] places every card using
//!    exactly those values.
//!
//! Nothing here fails. Missing collaborators fall back to built-in
//! defaults, out-of-range sizes are clamped, and degenerate requests
//! produce an empty plan.

use crate::content::{self, ContentSizes};
use crate::device::{self, DeviceClassifier, FallbackClassifier, ScreenSize};
use crate::grid;
use crate::legacy;
use crate::plan::{LayoutPlan, Side, SidePlan, SizedLayout};
use crate::policy::{self, Bounds, FallbackPolicy, PolicyBounds, PositionRatios, SizingPolicy};
use crate::types::{
    CardSize, ContentMode, DeviceClass, GridShape, LayoutRequest, LayoutType, LayoutVariant,
    Margins, Position, Rect, Spacing,
};
use serde::{Deserialize, Serialize};

/// Stacked cards aim for at least this height when gaps are solved.
const TARGET_CARD_HEIGHT: f64 = 60.0;
/// Stacked cards never get shorter than this before policy clamping.
const MIN_CARD_HEIGHT: f64 = 40.0;
/// Width counterparts for single-row (top-bottom) stacks.
const TARGET_CARD_WIDTH: f64 = 100.0;
const MIN_CARD_WIDTH: f64 = 60.0;

/// Grid gaps grow with the container past the policy's base values.
const HORIZONTAL_SPACING_RATIO: f64 = 0.01;
const VERTICAL_SPACING_RATIO: f64 = 0.008;

/// Stacked answer cards get up to this multiple of the prompt gap.
const ANSWER_GAP_FACTOR: f64 = 2.0;

/// Computes separated layouts for one request.
///
/// Device class and policy bounds are resolved once at construction; every
/// method afterwards is a pure function of that state.
#[derive(Debug, Clone)]
pub struct LayoutCalculator {
    request: LayoutRequest,
    device_class: DeviceClass,
    bounds: PolicyBounds,
}

impl LayoutCalculator {
    /// Calculator for a text-only deck using the built-in classifier and
    /// fallback policy.
    pub fn new(width: f64, height: f64, item_count: usize, layout_type: LayoutType) -> Self {
        Self::from_request(LayoutRequest::new(width, height, item_count).with_layout_type(layout_type))
    }

    /// Calculator using the built-in classifier and fallback policy.
    pub fn from_request(request: LayoutRequest) -> Self {
        Self::with_collaborators(request, &FallbackClassifier, &FallbackPolicy)
    }

    /// Calculator consulting the host's classifier and sizing policy.
    pub fn with_collaborators(
        request: LayoutRequest,
        classifier: &dyn DeviceClassifier,
        policy: &dyn SizingPolicy,
    ) -> Self {
        let viewport = request.viewport;
        let device_class = classifier.classify(viewport.width, viewport.height);
        let bounds = policy::resolve(policy, device_class);
        Self {
            request,
            device_class,
            bounds,
        }
    }

    /// Same request, with or without image cards.
    pub fn with_images(mut self, has_images: bool) -> Self {
        self.request.has_images = has_images;
        self
    }

    pub fn request(&self) -> &LayoutRequest {
        &self.request
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    /// Policy bounds in effect after fallback and sanitizing.
    pub fn bounds(&self) -> &PolicyBounds {
        &self.bounds
    }

    pub fn variant(&self) -> LayoutVariant {
        LayoutVariant::for_item_count(self.request.item_count)
    }

    pub fn content_mode(&self) -> ContentMode {
        ContentMode::from_images(self.request.has_images)
    }

    pub fn primary_shape(&self) -> GridShape {
        grid::primary_shape(
            self.request.item_count,
            self.request.layout_type,
            self.content_mode(),
        )
    }

    pub fn secondary_shape(&self) -> GridShape {
        grid::secondary_shape(self.request.item_count, self.request.layout_type)
    }

    pub fn margins(&self) -> Margins {
        self.bounds.margins
    }

    /// Container width left after margins.
    pub fn available_width(&self) -> f64 {
        let margins = self.margins();
        (self.request.viewport.width - margins.left - margins.right).max(0.0)
    }

    /// Container height left after margins.
    pub fn available_height(&self) -> f64 {
        let margins = self.margins();
        (self.request.viewport.height - margins.top - margins.bottom).max(0.0)
    }

    /// Base grid gaps, scaled with the container and clamped to the policy.
    pub fn grid_spacing(&self) -> Spacing {
        let viewport = self.request.viewport;
        let spacing = &self.bounds.spacing;
        let range = spacing.range();
        Spacing::new(
            range.apply(
                spacing
                    .horizontal
                    .max(viewport.width * HORIZONTAL_SPACING_RATIO)
                    .floor(),
            ),
            range.apply(
                spacing
                    .vertical
                    .max(viewport.height * VERTICAL_SPACING_RATIO)
                    .floor(),
            ),
        )
    }

    /// Solve card size and gaps for this request.
    pub fn calculate_optimal_card_size(&self) -> SizedLayout {
        if self.request.is_degenerate() {
            return SizedLayout::EMPTY;
        }

        let item_count = self.request.item_count;
        let layout_type = self.request.layout_type;
        let stack = Axis::stacking(layout_type);
        let spacing = self.grid_spacing();
        let regions = self.regions(spacing);
        let shape = self.primary_shape();
        let range = self.bounds.spacing.range();

        if grid::is_stacked(shape, layout_type) {
            let available = regions.primary.length(stack);
            let gap = solve_gap(available, item_count, stack.target_card_length(), range);
            let along = self
                .card_bounds(stack)
                .apply(
                    ((available - (item_count - 1) as f64 * gap) / item_count as f64)
                        .floor()
                        .max(stack.min_card_length()),
                );
            let cross_axis = stack.cross();
            let across = self
                .card_bounds(cross_axis)
                .apply(regions.primary.length(cross_axis).floor());

            let secondary_gap =
                answer_gap(regions.secondary.length(stack), item_count, along, gap);
            return SizedLayout {
                card_size: stack.card_size(along, across),
                spacing: stack.with_gap(spacing, gap),
                secondary_spacing: stack.with_gap(spacing, secondary_gap),
            };
        }

        let columns = shape.columns as f64;
        let rows = shape.rows as f64;
        let mut width =
            (regions.primary.width - (columns - 1.0) * spacing.horizontal) / columns;
        let mut height = (regions.primary.height - (rows - 1.0) * spacing.vertical) / rows;
        if self.content_mode() == ContentMode::Square {
            let side = width.min(height);
            width = side;
            height = side;
        }
        let card_size = CardSize::new(
            self.bounds.card_width.apply(width.floor()),
            self.bounds.card_height.apply(height.floor()),
        );

        let secondary_gap = solve_gap(
            regions.secondary.length(stack),
            item_count,
            stack.card_length(card_size),
            range,
        );

        SizedLayout {
            card_size,
            spacing,
            secondary_spacing: stack.with_gap(spacing, secondary_gap),
        }
    }

    /// Place every card of both sides using a solved size.
    pub fn calculate_positions(&self, sized: &SizedLayout) -> (SidePlan, SidePlan) {
        let primary_shape = self.primary_shape();
        let secondary_shape = self.secondary_shape();

        if self.request.is_degenerate() || sized.card_size.is_empty() {
            let empty = |grid, spacing| SidePlan {
                grid,
                spacing,
                positions: Vec::new(),
            };
            return (
                empty(primary_shape, sized.spacing),
                empty(secondary_shape, sized.secondary_spacing),
            );
        }

        let layout_type = self.request.layout_type;
        let regions = self.regions(self.grid_spacing());
        let ratios = &self.bounds.positions;
        let viewport = self.request.viewport;

        let primary = self.place_side(
            primary_shape,
            sized.card_size,
            sized.spacing,
            regions.primary,
            Anchor::primary(ratios, layout_type, viewport.width, viewport.height),
        );
        let secondary = self.place_side(
            secondary_shape,
            sized.card_size,
            sized.secondary_spacing,
            regions.secondary,
            Anchor::secondary(ratios, layout_type, viewport.width, viewport.height),
        );

        (primary, secondary)
    }

    /// Compute the complete plan.
    pub fn full_calculation(&self) -> LayoutPlan {
        let sized = self.calculate_optimal_card_size();
        let (primary, secondary) = self.calculate_positions(&sized);

        let plan = LayoutPlan {
            device_class: self.device_class,
            layout_type: self.request.layout_type,
            variant: self.variant(),
            content_mode: self.content_mode(),
            item_count: self.request.item_count,
            card_size: sized.card_size,
            margins: self.margins(),
            available_width: self.available_width(),
            available_height: self.available_height(),
            content_sizes: ContentSizes::for_card(sized.card_size),
            primary,
            secondary,
        };

        if !plan.is_empty() {
            self.log_plan(&plan);
        }
        plan
    }

    /// Font size for a caption on this layout's cards.
    pub fn font_size_for(&self, text: &str) -> f64 {
        let card_size = self.calculate_optimal_card_size().card_size;
        if card_size.is_empty() {
            return 0.0;
        }
        content::font_size(card_size.height, text)
    }

    /// Breakpoint flags and solver comparisons for diagnosing a layout.
    pub fn debug_info(&self) -> DebugInfo {
        let viewport = self.request.viewport;
        let sized = self.calculate_optimal_card_size();
        let (primary, _) = self.calculate_positions(&sized);
        let region = self.regions(self.grid_spacing()).primary;

        DebugInfo {
            width: viewport.width,
            height: viewport.height,
            item_count: self.request.item_count,
            layout_type: self.request.layout_type,
            device_class: self.device_class,
            screen_size: device::screen_size(viewport.height),
            is_ipad: device::is_ipad(viewport.width, viewport.height),
            is_landscape_mobile: device::is_landscape_mobile(viewport.width, viewport.height),
            card_size: sized.card_size,
            legacy_card_size: legacy::card_size_by_item_count(self.request.item_count),
            utilization: utilization(&primary, sized.card_size, region),
        }
    }

    fn card_bounds(&self, axis: Axis) -> Bounds {
        match axis {
            Axis::Horizontal => self.bounds.card_width,
            Axis::Vertical => self.bounds.card_height,
        }
    }

    /// Split the available area into the two sides, leaving a gutter of one
    /// split-axis gap between them.
    fn regions(&self, spacing: Spacing) -> Regions {
        let margins = self.margins();
        let area = Rect::new(
            margins.left,
            margins.top,
            self.available_width(),
            self.available_height(),
        );
        let split = Axis::stacking(self.request.layout_type).cross();
        let gutter = split.gap(spacing) / 2.0;
        let container = match split {
            Axis::Horizontal => self.request.viewport.width,
            Axis::Vertical => self.request.viewport.height,
        };

        let start = split.start(area);
        let end = start + area.length(split);
        let divider = (container * self.bounds.positions.divider()).max(start).min(end);
        let primary_end = (divider - gutter).max(start);
        let secondary_start = (divider + gutter).min(end);

        Regions {
            primary: split.resize(area, start, primary_end - start),
            secondary: split.resize(area, secondary_start, end - secondary_start),
        }
    }

    fn place_side(
        &self,
        shape: GridShape,
        card_size: CardSize,
        spacing: Spacing,
        region: Rect,
        anchor: Anchor,
    ) -> SidePlan {
        let columns = shape.columns as f64;
        let rows = shape.rows as f64;
        let block_width = columns * card_size.width + (columns - 1.0) * spacing.horizontal;
        let block_height = rows * card_size.height + (rows - 1.0) * spacing.vertical;

        let start_x = place(
            anchor.x - anchor.center_x * block_width / 2.0,
            block_width,
            region.x,
            region.width,
        );
        let start_y = place(
            anchor.y - anchor.center_y * block_height / 2.0,
            block_height,
            region.y,
            region.height,
        );

        let positions = (0..self.request.item_count)
            .map(|index| {
                let (column, row) = shape.cell(index);
                Position::new(
                    start_x + column as f64 * (card_size.width + spacing.horizontal),
                    start_y + row as f64 * (card_size.height + spacing.vertical),
                )
            })
            .collect();

        SidePlan {
            grid: shape,
            spacing,
            positions,
        }
    }

    fn log_plan(&self, plan: &LayoutPlan) {
        let regions = self.regions(self.grid_spacing());
        tracing::debug!(
            device = self.device_class.as_str(),
            layout = self.request.layout_type.as_str(),
            variant = ?plan.variant,
            items = plan.item_count,
            columns = plan.grid_shape().columns,
            rows = plan.grid_shape().rows,
            card_width = plan.card_size.width,
            card_height = plan.card_size.height,
            utilization = utilization(&plan.primary, plan.card_size, regions.primary),
            "computed separated layout"
        );

        for side in self.overflowing_sides(plan) {
            let region = regions.get(side);
            tracing::debug!(
                side = ?side,
                items = plan.item_count,
                region_width = region.width,
                region_height = region.height,
                "cards overflow their region at minimum size"
            );
        }
    }

    /// Sides whose card block is wider or taller than their region.
    fn overflowing_sides(&self, plan: &LayoutPlan) -> Vec<Side> {
        let regions = self.regions(self.grid_spacing());
        [Side::Primary, Side::Secondary]
            .into_iter()
            .filter(|&side| {
                let region = regions.get(side);
                plan.side(side)
                    .bounding_box(plan.card_size)
                    .is_some_and(|block| block.width > region.width || block.height > region.height)
            })
            .collect()
    }
}

/// Introspection block for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub width: f64,
    pub height: f64,
    pub item_count: usize,
    pub layout_type: LayoutType,
    pub device_class: DeviceClass,
    pub screen_size: ScreenSize,
    pub is_ipad: bool,
    pub is_landscape_mobile: bool,
    /// Size chosen by the dynamic solver.
    pub card_size: CardSize,
    /// Size the fixed item-count table would have chosen.
    pub legacy_card_size: CardSize,
    /// Fraction of the prompt region covered by cards.
    pub utilization: f64,
}

struct Regions {
    primary: Rect,
    secondary: Rect,
}

impl Regions {
    fn get(&self, side: Side) -> Rect {
        match side {
            Side::Primary => self.primary,
            Side::Secondary => self.secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Direction a single-stack side grows in.
    fn stacking(layout_type: LayoutType) -> Self {
        match layout_type {
            LayoutType::LeftRight => Self::Vertical,
            LayoutType::TopBottom => Self::Horizontal,
        }
    }

    fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    fn target_card_length(self) -> f64 {
        match self {
            Self::Horizontal => TARGET_CARD_WIDTH,
            Self::Vertical => TARGET_CARD_HEIGHT,
        }
    }

    fn min_card_length(self) -> f64 {
        match self {
            Self::Horizontal => MIN_CARD_WIDTH,
            Self::Vertical => MIN_CARD_HEIGHT,
        }
    }

    fn card_length(self, size: CardSize) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Card size from its length along `self` and across it.
    fn card_size(self, along: f64, across: f64) -> CardSize {
        match self {
            Self::Horizontal => CardSize::new(along, across),
            Self::Vertical => CardSize::new(across, along),
        }
    }

    fn gap(self, spacing: Spacing) -> f64 {
        match self {
            Self::Horizontal => spacing.horizontal,
            Self::Vertical => spacing.vertical,
        }
    }

    fn with_gap(self, spacing: Spacing, gap: f64) -> Spacing {
        match self {
            Self::Horizontal => Spacing::new(gap, spacing.vertical),
            Self::Vertical => Spacing::new(spacing.horizontal, gap),
        }
    }

    fn start(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.x,
            Self::Vertical => rect.y,
        }
    }

    /// `rect` with its extent along `self` replaced.
    fn resize(self, rect: Rect, start: f64, length: f64) -> Rect {
        let length = length.max(0.0);
        match self {
            Self::Horizontal => Rect::new(start, rect.y, length, rect.height),
            Self::Vertical => Rect::new(rect.x, start, rect.width, length),
        }
    }
}

trait Extent {
    fn length(&self, axis: Axis) -> f64;
}

impl Extent for Rect {
    fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Preferred block placement for one side.
///
/// Along the split axis the block is centered on the anchor; along the
/// stacking axis the anchor marks where the block starts.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    x: f64,
    y: f64,
    /// 1.0 when the block is centered on `x`, 0.0 when it starts there.
    center_x: f64,
    center_y: f64,
}

impl Anchor {
    fn primary(ratios: &PositionRatios, layout_type: LayoutType, width: f64, height: f64) -> Self {
        Self::new(ratios.primary_anchor, ratios.primary_start, layout_type, width, height)
    }

    fn secondary(ratios: &PositionRatios, layout_type: LayoutType, width: f64, height: f64) -> Self {
        Self::new(ratios.secondary_anchor, ratios.secondary_start, layout_type, width, height)
    }

    fn new(split: f64, start: f64, layout_type: LayoutType, width: f64, height: f64) -> Self {
        match layout_type {
            LayoutType::LeftRight => Self {
                x: width * split,
                y: height * start,
                center_x: 1.0,
                center_y: 0.0,
            },
            LayoutType::TopBottom => Self {
                x: width * start,
                y: height * split,
                center_x: 0.0,
                center_y: 1.0,
            },
        }
    }
}

/// Gap that lets `count` cards of `card_length` fill `available`, clamped
/// to `range` and snapped to whole pixels.
fn solve_gap(available: f64, count: usize, card_length: f64, range: Bounds) -> f64 {
    if count <= 1 {
        return range.min;
    }
    let gaps = (count - 1) as f64;
    range.apply(((available - count as f64 * card_length) / gaps).floor())
}

/// Gap for the answer stack next to a stacked prompt side: `gap` widened by
/// [`ANSWER_GAP_FACTOR`] as far as `count` cards of `card_length` still fit
/// in `available`, and never tighter than `gap`.
fn answer_gap(available: f64, count: usize, card_length: f64, gap: f64) -> f64 {
    if count <= 1 {
        return gap;
    }
    let fitting = ((available - count as f64 * card_length) / (count - 1) as f64).floor();
    (gap * ANSWER_GAP_FACTOR).min(fitting).max(gap)
}

/// Start of a block of `length` inside `[region_start, region_start + region_length]`,
/// as close to `preferred` as fits. Oversized blocks start at the region start.
fn place(preferred: f64, length: f64, region_start: f64, region_length: f64) -> f64 {
    if length >= region_length {
        return region_start.floor();
    }
    preferred
        .max(region_start)
        .min(region_start + region_length - length)
        .floor()
}

fn utilization(side: &SidePlan, card_size: CardSize, region: Rect) -> f64 {
    let region_area = region.area();
    if region_area <= 0.0 {
        return 0.0;
    }
    let covered: f64 = side.card_rects(card_size).map(|rect| rect.area()).sum();
    covered / region_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PolicyTable, FALLBACK_BOUNDS};
    use pretty_assertions::assert_eq;

    fn plan(width: f64, height: f64, item_count: usize) -> LayoutPlan {
        LayoutCalculator::new(width, height, item_count, LayoutType::LeftRight).full_calculation()
    }

    #[test]
    fn seven_cards_on_a_tablet() {
        let plan = plan(1024.0, 768.0, 7);

        assert_eq!(plan.device_class, DeviceClass::TabletLandscape);
        assert_eq!(plan.variant, LayoutVariant::MultiRows);
        assert_eq!(plan.grid_shape(), GridShape::new(1, 7));
        assert_eq!(plan.secondary.grid, GridShape::new(1, 7));
        assert_eq!(plan.card_size, CardSize::new(250.0, 75.0));
        assert_eq!(plan.spacing(), Spacing::new(15.0, 30.0));
        assert_eq!(plan.primary.positions.len(), 7);
        assert_eq!(plan.primary.positions[0], Position::new(182.0, 33.0));
        assert_eq!(plan.primary.positions[1], Position::new(182.0, 138.0));
        assert_eq!(plan.secondary.positions[0], Position::new(591.0, 33.0));
        assert!(!plan.primary.has_overlap(plan.card_size));
    }

    #[test]
    fn stacked_cards_fill_the_height() {
        let calculator = LayoutCalculator::new(1024.0, 768.0, 4, LayoutType::LeftRight);
        let sized = calculator.calculate_optimal_card_size();
        let used = 4.0 * sized.card_size.height + 3.0 * sized.spacing.vertical;
        assert!(used <= calculator.available_height());
        // Height is capped at the policy maximum for short decks.
        assert_eq!(sized.card_size.height, FALLBACK_BOUNDS.card_height.max);
    }

    #[test]
    fn solved_gap_between_limits_fills_the_height_exactly() {
        let calculator = LayoutCalculator::new(1024.0, 400.0, 5, LayoutType::LeftRight);
        let sized = calculator.calculate_optimal_card_size();
        let range = FALLBACK_BOUNDS.spacing.range();

        assert_eq!(calculator.available_height(), 340.0);
        assert_eq!(sized.spacing.vertical, 10.0);
        assert!(range.min < sized.spacing.vertical && sized.spacing.vertical < range.max);
        assert_eq!(sized.card_size.height, 60.0);
        let used = 5.0 * sized.card_size.height + 4.0 * sized.spacing.vertical;
        assert_eq!(used, calculator.available_height());
    }

    #[test]
    fn answer_stack_gets_roomier_gaps_when_space_allows() {
        let calculator = LayoutCalculator::new(1024.0, 768.0, 4, LayoutType::LeftRight);
        let plan = calculator.full_calculation();

        assert_eq!(plan.spacing().vertical, 30.0);
        assert_eq!(plan.secondary.spacing.vertical, 60.0);
        assert_eq!(plan.secondary.spacing.horizontal, plan.spacing().horizontal);
        let step = plan.secondary.positions[1].y - plan.secondary.positions[0].y;
        assert_eq!(step, plan.card_size.height + 60.0);

        let regions = calculator.regions(calculator.grid_spacing());
        let block = plan.secondary.bounding_box(plan.card_size).unwrap();
        assert!(regions.secondary.contains(&block), "{block:?} outside {:?}", regions.secondary);
    }

    #[test]
    fn answer_gap_never_tighter_than_prompt_gap() {
        for (height, item_count) in [(250.0, 5), (400.0, 5), (500.0, 5), (768.0, 7), (900.0, 3)] {
            let plan = LayoutCalculator::new(1024.0, height, item_count, LayoutType::LeftRight)
                .full_calculation();
            assert!(plan.secondary.spacing.vertical >= plan.spacing().vertical);
            assert!(!plan.secondary.has_overlap(plan.card_size));
        }
        let plan = LayoutCalculator::new(1280.0, 900.0, 4, LayoutType::TopBottom).full_calculation();
        assert!(plan.secondary.spacing.horizontal >= plan.spacing().horizontal);
    }

    #[test]
    fn answer_gap_is_capped_by_what_fits() {
        assert_eq!(answer_gap(340.0, 5, 60.0, 10.0), 10.0);
        assert_eq!(answer_gap(708.0, 4, 80.0, 30.0), 60.0);
        // (708 - 4*152) / 3 = 33.3
        assert_eq!(answer_gap(708.0, 4, 152.0, 30.0), 33.0);
        assert_eq!(answer_gap(700.0, 4, 160.0, 30.0), 30.0);
        assert_eq!(answer_gap(100.0, 1, 60.0, 12.0), 12.0);
    }

    #[test]
    fn fractional_policy_still_gives_whole_pixels() {
        let json = r#"{
            "tablet-landscape": {
                "card_width": { "min": 100.5, "max": 180.5 },
                "card_height": { "min": 40.5, "max": 60.5 },
                "positions": {
                    "primary_anchor": 0.25, "secondary_anchor": 0.75,
                    "primary_start": 0.1, "secondary_start": 0.1
                },
                "spacing": { "horizontal": 12, "vertical": 8, "min": 5, "max": 20.5 },
                "margins": { "top": 20, "bottom": 20, "left": 20, "right": 20 }
            }
        }"#;
        let table = PolicyTable::from_json(json).unwrap();
        let request = LayoutRequest::new(1024.0, 768.0, 4);
        let plan = LayoutCalculator::with_collaborators(request, &FallbackClassifier, &table)
            .full_calculation();

        assert_eq!(plan.card_size, CardSize::new(180.0, 60.0));
        assert_eq!(plan.spacing(), Spacing::new(12.0, 20.0));
        for position in plan.primary.positions.iter().chain(&plan.secondary.positions) {
            assert_eq!(position.x, position.x.floor());
            assert_eq!(position.y, position.y.floor());
        }
    }

    #[test]
    fn overflow_is_reported_for_the_answer_stack() {
        let calculator = LayoutCalculator::new(1024.0, 768.0, 25, LayoutType::LeftRight);
        let plan = calculator.full_calculation();
        assert_eq!(plan.grid_shape(), GridShape::new(2, 13));
        assert_eq!(calculator.overflowing_sides(&plan), vec![Side::Secondary]);

        let roomy = LayoutCalculator::new(1024.0, 768.0, 7, LayoutType::LeftRight);
        assert!(roomy.overflowing_sides(&roomy.full_calculation()).is_empty());
    }

    #[test]
    fn single_card_gets_minimum_gap() {
        let sized = LayoutCalculator::new(800.0, 600.0, 1, LayoutType::LeftRight)
            .calculate_optimal_card_size();
        assert_eq!(sized.spacing.vertical, FALLBACK_BOUNDS.spacing.min);
    }

    #[test]
    fn cramped_stack_floors_height_and_overflows() {
        let calculator = LayoutCalculator::new(1024.0, 250.0, 5, LayoutType::LeftRight);
        let plan = calculator.full_calculation();
        assert_eq!(plan.card_size.height, 40.0);
        assert_eq!(plan.spacing().vertical, 5.0);
        assert!(!plan.primary.has_overlap(plan.card_size));
    }

    #[test]
    fn grid_cards_share_the_region() {
        let plan = plan(1280.0, 800.0, 8);
        assert_eq!(plan.grid_shape(), GridShape::new(2, 4));
        // (617.5 - 15) / 2, floored, then clamped to 120..=250
        assert_eq!(plan.card_size.width, 250.0);
        assert!(plan.card_size.height <= 80.0);
        assert!(!plan.primary.has_overlap(plan.card_size));
        assert!(!plan.secondary.has_overlap(plan.card_size));
    }

    #[test]
    fn square_mode_makes_square_cards_when_bounds_allow() {
        let overrides = crate::policy::PolicyOverrides {
            card_width: Some(Bounds::new(40.0, 300.0)),
            card_height: Some(Bounds::new(40.0, 300.0)),
            ..Default::default()
        };
        let table = PolicyTable::new().with_overrides(DeviceClass::Desktop, &overrides);
        let request = LayoutRequest::new(1600.0, 900.0, 12).with_images(true);
        let calculator =
            LayoutCalculator::with_collaborators(request, &FallbackClassifier, &table);
        let sized = calculator.calculate_optimal_card_size();
        assert_eq!(calculator.primary_shape(), GridShape::new(5, 3));
        assert_eq!(sized.card_size.width, sized.card_size.height);
    }

    #[test]
    fn top_bottom_places_secondary_below() {
        let plan = LayoutCalculator::new(1280.0, 900.0, 6, LayoutType::TopBottom).full_calculation();
        assert_eq!(plan.grid_shape(), GridShape::new(3, 2));
        assert_eq!(plan.secondary.grid, GridShape::new(6, 1));

        let secondary_rows: Vec<f64> = plan.secondary.positions.iter().map(|p| p.y).collect();
        assert!(secondary_rows.windows(2).all(|pair| pair[0] == pair[1]));

        let top = plan.primary.bounding_box(plan.card_size).unwrap();
        let bottom = plan.secondary.bounding_box(plan.card_size).unwrap();
        assert!(top.y < bottom.y);
        assert!(!plan.secondary.has_overlap(plan.card_size));
    }

    #[test]
    fn top_bottom_small_deck_is_one_row() {
        let plan = LayoutCalculator::new(1280.0, 900.0, 4, LayoutType::TopBottom).full_calculation();
        assert_eq!(plan.grid_shape(), GridShape::new(4, 1));
        let ys: Vec<f64> = plan.primary.positions.iter().map(|p| p.y).collect();
        assert!(ys.iter().all(|y| *y == ys[0]));
        assert!(!plan.primary.has_overlap(plan.card_size));
    }

    #[test]
    fn zero_items_produce_an_empty_plan() {
        let plan = plan(1024.0, 768.0, 0);
        assert!(plan.is_empty());
        assert_eq!(plan.card_size, CardSize::ZERO);
        assert_eq!(plan.grid_shape(), GridShape::EMPTY);
        assert_eq!(plan.content_sizes, ContentSizes::default());
    }

    #[test]
    fn zero_viewport_produces_an_empty_plan() {
        let plan = plan(0.0, 0.0, 6);
        assert!(plan.is_empty());
        assert_eq!(plan.card_size, CardSize::ZERO);
        assert_eq!(plan.available_width, 0.0);
        assert_eq!(plan.grid_shape(), GridShape::new(2, 3));
    }

    #[test]
    fn tiny_viewport_clamps_to_minimum_cards() {
        let plan = plan(20.0, 20.0, 3);
        assert_eq!(plan.card_size, CardSize::new(120.0, 40.0));
        assert!(!plan.primary.has_overlap(plan.card_size));
    }

    #[test]
    fn builtin_policy_changes_bounds_per_device() {
        let table = PolicyTable::builtin();
        let request = LayoutRequest::new(1920.0, 1080.0, 3);
        let calculator = LayoutCalculator::with_collaborators(request, &FallbackClassifier, &table);
        let plan = calculator.full_calculation();
        assert_eq!(plan.device_class, DeviceClass::Desktop);
        assert!(calculator.bounds().card_height.contains(plan.card_size.height));
        assert_eq!(plan.margins.left, 15.0);
    }

    #[test]
    fn custom_classifier_is_consulted() {
        struct AlwaysPhone;
        impl DeviceClassifier for AlwaysPhone {
            fn classify(&self, _width: f64, _height: f64) -> DeviceClass {
                DeviceClass::MobilePortrait
            }
        }

        let request = LayoutRequest::new(1920.0, 1080.0, 3);
        let calculator =
            LayoutCalculator::with_collaborators(request, &AlwaysPhone, &PolicyTable::builtin());
        assert_eq!(calculator.device_class(), DeviceClass::MobilePortrait);
        assert_eq!(calculator.bounds().card_width.max, 200.0);
    }

    #[test]
    fn sized_layout_is_threaded_into_positions() {
        let calculator = LayoutCalculator::new(1024.0, 768.0, 5, LayoutType::LeftRight);
        let sized = calculator.calculate_optimal_card_size();
        let (primary, secondary) = calculator.calculate_positions(&sized);
        assert_eq!(primary.spacing, sized.spacing);
        assert_eq!(secondary.spacing, sized.secondary_spacing);
        let step = primary.positions[1].y - primary.positions[0].y;
        assert_eq!(step, sized.card_size.height + sized.spacing.vertical);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let calculator = LayoutCalculator::new(900.0, 700.0, 13, LayoutType::LeftRight).with_images(true);
        assert_eq!(calculator.full_calculation(), calculator.full_calculation());
    }

    #[test]
    fn font_size_shrinks_for_long_captions() {
        let calculator = LayoutCalculator::new(1024.0, 768.0, 4, LayoutType::LeftRight);
        assert!(calculator.font_size_for("a considerably longer caption") < calculator.font_size_for("cat"));
        let empty = LayoutCalculator::new(1024.0, 768.0, 0, LayoutType::LeftRight);
        assert_eq!(empty.font_size_for("cat"), 0.0);
    }

    #[test]
    fn debug_info_reports_both_solvers() {
        let info = LayoutCalculator::new(1024.0, 768.0, 7, LayoutType::LeftRight).debug_info();
        assert_eq!(info.screen_size, ScreenSize::Medium);
        assert!(info.is_ipad);
        assert!(!info.is_landscape_mobile);
        assert_eq!(info.card_size, CardSize::new(250.0, 75.0));
        assert_eq!(info.legacy_card_size, CardSize::new(220.0, 70.0));
        assert!(info.utilization > 0.0 && info.utilization <= 1.0);
    }

    #[test]
    fn plan_rects_match_positions() {
        let plan = plan(1024.0, 768.0, 3);
        let rects = plan.card_rects(Side::Secondary);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].width, plan.card_size.width);
    }
}
