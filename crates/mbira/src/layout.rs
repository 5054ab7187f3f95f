//! Tablature layout engine.
//!
//! Walks the parsed symbol sequence once, keeps the beat arithmetic honest
//! (symbols may never straddle a bar line), paginates across fixed-size
//! tablatures and emits absolute drawing commands through a [`Surface`].
//!
//! The tablature is drawn bottom-up: `current_y` starts at the bottom of
//! each tablature and decreases as symbols are placed, the way a kalimba
//! player reads toward the bridge.

use thiserror::Error;
use tracing::debug;

use crate::ast::{BaseLength, Chord, Note, Rest, Symbol};

/// Lane labels across the tablature, left to right. The physical tine
/// arrangement interleaves the two octave ends around the longest tine in
/// the middle.
const TAB_LANES: &str = "DBGECAFDCEGBDFACE";
const NUM_LANES: usize = TAB_LANES.len();
const HALF_LANES: usize = NUM_LANES / 2;

/// Diatonic pitch occupying each lane, index 0 = leftmost.
const PITCH_LANES: [u8; NUM_LANES] = [15, 13, 11, 9, 7, 5, 3, 1, 0, 2, 4, 6, 8, 10, 12, 14, 16];

const LANE_WIDTH: i32 = 15;
/// Extra rectangle height per lane step, fanning the lane bottoms out.
const LANE_OFFSET_Y: i32 = 5;
const TAB_WIDTH: i32 = LANE_WIDTH * NUM_LANES as i32;
const TAB_MARGIN_X: i32 = 50;
const TAB_MARGIN_Y: i32 = 10;
const TAB_CENTER: i32 = HALF_LANES as i32 * LANE_WIDTH + MEASURE_THICKNESS / 2;

const MEASURE_THICKNESS: i32 = 3;
const FONT_SIZE: i32 = 10;
const NOTE_RADIUS: i32 = 4;
/// Vertical space one eighth beat occupies.
const SYMBOL_HEIGHT: i32 = LANE_WIDTH;

/// X of the stem gutter, left of the leftmost lane.
const STEM_X: i32 = -20;

const THIN_STYLE: &str = "stroke-width:1;stroke:black";
const MEASURE_STYLE: &str = "stroke-width:3;stroke:black";
const TEXT_STYLE: &str = "font-size:10;fill:black";
const LANE_COLOR: &str = "white";
const LANE_MARKED: &str = "salmon";

/// Minimal vector-drawing capability the layout engine draws through.
///
/// Any backend that can place rectangles, lines, circles, polylines and
/// text inside translated groups can render a score.
pub trait Surface {
    /// Open the canvas with its final pixel size.
    fn begin(&mut self, width: i32, height: i32);
    /// Close the canvas.
    fn end(&mut self);
    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, style: &str);
    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, style: &str);
    fn circle(&mut self, cx: i32, cy: i32, radius: i32, style: &str);
    fn polyline(&mut self, xs: &[i32], ys: &[i32], style: &str);
    fn text(&mut self, x: i32, y: i32, content: &str, style: &str);
    /// Open a group translated by (dx, dy); coordinates inside are relative.
    fn begin_group(&mut self, dx: i32, dy: i32);
    fn end_group(&mut self);
}

/// Layout configuration. Changing it moves bar lines and page breaks but
/// never affects parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Eighth beats per measure. Must be positive.
    pub beats_per_measure: u32,
    /// Measures per tablature page. Must be positive.
    pub measures_per_tab: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams {
            beats_per_measure: 8,
            measures_per_tab: 7,
        }
    }
}

/// Layout failures. Both are malformed-input conditions and abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("measure {measure} holds {got} eighth beats, expected {expected}")]
    MeasureOverflow { measure: u32, got: u32, expected: u32 },

    #[error("pitch {0} is not on the tablature")]
    PitchOutOfRange(u8),
}

/// Count the measures needed to fit all symbols, last one possibly partial.
pub fn count_measures(symbols: &[Symbol], params: &LayoutParams) -> u32 {
    let beats: u32 = symbols.iter().map(|s| s.eighth_beats()).sum();
    beats.div_ceil(params.beats_per_measure)
}

/// Render a symbol sequence onto a drawing surface.
///
/// Two passes over the symbols: [`count_measures`] first fixes the page
/// count and canvas size, then a single walk places everything.
pub fn render<S: Surface>(
    symbols: &[Symbol],
    params: &LayoutParams,
    surface: &mut S,
) -> Result<(), LayoutError> {
    let mut layout = TabLayout::new(surface, *params, count_measures(symbols, params));

    for symbol in symbols {
        layout.place(symbol)?;
    }

    layout.finish();
    Ok(())
}

/// Per-render layout state, threaded through symbol placement.
struct TabLayout<'a, S: Surface> {
    surface: &'a mut S,
    params: LayoutParams,
    total_measures: u32,

    cur_tab: u32,
    tab_measures_left: u32,
    tab_started: bool,
    measure: u32,
    measure_beats: u32,
    current_y: i32,

    /// Y of an eighth note still waiting for a beam partner.
    pending_eighth: Option<i32>,
}

impl<'a, S: Surface> TabLayout<'a, S> {
    fn new(surface: &'a mut S, params: LayoutParams, total_measures: u32) -> Self {
        let mut layout = TabLayout {
            surface,
            params,
            total_measures,
            cur_tab: 0,
            tab_measures_left: 0,
            tab_started: false,
            measure: 0,
            measure_beats: 0,
            current_y: 0,
            pending_eighth: None,
        };

        let tabs = layout.total_tabs() as i32;
        let width = tabs * TAB_WIDTH + (tabs + 1) * TAB_MARGIN_X;
        let height = layout.max_tab_height()
            + TAB_MARGIN_Y * 2
            + HALF_LANES as i32 * LANE_OFFSET_Y
            + FONT_SIZE;

        layout.surface.begin(width, height);
        layout.surface.rect(0, 0, width, height, "fill:white");
        layout
    }

    fn total_tabs(&self) -> u32 {
        self.total_measures.div_ceil(self.params.measures_per_tab)
    }

    /// Height of a tablature holding `measures`, plus room for the end bar
    /// on the final one.
    fn tab_height(&self, measures: u32, with_end_bar: bool) -> i32 {
        let mut height =
            ((self.params.beats_per_measure + 1) * measures) as i32 * SYMBOL_HEIGHT;
        if with_end_bar {
            height += SYMBOL_HEIGHT;
        }
        height
    }

    fn max_tab_height(&self) -> i32 {
        self.tab_height(self.params.measures_per_tab, true)
    }

    /// Place one symbol, opening measures and tablatures as needed.
    fn place(&mut self, symbol: &Symbol) -> Result<(), LayoutError> {
        if self.measure_beats % self.params.beats_per_measure == 0 {
            self.flush_pending();

            if self.tab_measures_left == 0 {
                self.new_tab();
            }

            self.add_measure();
            self.measure_beats = 0;
        }

        match symbol {
            Symbol::Note(note) => self.place_note(note)?,
            Symbol::Chord(chord) => self.place_chord(chord)?,
            Symbol::Rest(rest) => self.place_rest(rest),
        }

        // A pending eighth this symbol neither beamed with nor recorded is
        // unpaired for good; give it its taper now.
        if self.pending_eighth.is_some_and(|y| y != self.current_y) {
            self.flush_pending();
        }

        let beats = symbol.eighth_beats();
        self.current_y -= beats as i32 * SYMBOL_HEIGHT;

        self.measure_beats += beats;
        if self.measure_beats > self.params.beats_per_measure {
            return Err(LayoutError::MeasureOverflow {
                measure: self.measure,
                got: self.measure_beats,
                expected: self.params.beats_per_measure,
            });
        }

        Ok(())
    }

    /// Flush the beam state and close out the canvas. The last pending
    /// eighth of the stream still gets its taper.
    fn finish(&mut self) {
        self.flush_pending();

        if self.tab_started {
            // Closing double bar on the last measure.
            let mut end_y = MEASURE_THICKNESS / 2;
            self.surface.line(0, end_y, TAB_WIDTH, end_y, MEASURE_STYLE);
            end_y += SYMBOL_HEIGHT / 2;
            self.surface.line(0, end_y, TAB_WIDTH, end_y, THIN_STYLE);

            self.surface.end_group();
            self.tab_started = false;
        }

        self.surface.end();
    }

    /// Open the next tablature page. The height is recomputed from the
    /// measures actually remaining so the last page is sized exactly.
    fn new_tab(&mut self) {
        if self.tab_started {
            self.surface.end_group();
        }

        let remaining = self.total_measures - self.params.measures_per_tab * self.cur_tab;
        let last_tab = remaining <= self.params.measures_per_tab;
        self.tab_measures_left = remaining.min(self.params.measures_per_tab);
        self.cur_tab += 1;

        let tab_height = self.tab_height(self.tab_measures_left, last_tab);
        let offset_x = self.cur_tab as i32 * TAB_MARGIN_X + (self.cur_tab as i32 - 1) * TAB_WIDTH;
        let offset_y = TAB_MARGIN_Y + self.max_tab_height() - tab_height;

        debug!(
            tab = self.cur_tab,
            measures = self.tab_measures_left,
            "starting tablature"
        );
        self.surface.begin_group(offset_x, offset_y);

        for lane in 0..NUM_LANES {
            let marked = (lane + 1) % 3 == 0;
            // Lane bottoms fan downward to the center, then back up.
            let offset = if lane < HALF_LANES {
                lane
            } else {
                NUM_LANES - lane - 1
            };
            self.draw_lane(tab_height, lane, offset as i32, marked);
        }

        // Center line along the longest tine.
        let line_height = tab_height + HALF_LANES as i32 * LANE_OFFSET_Y;
        self.surface
            .line(TAB_CENTER, 0, TAB_CENTER, line_height, MEASURE_STYLE);

        self.current_y = tab_height;
        self.tab_started = true;
    }

    /// Draw one lane rectangle spanning the tablature, with its label.
    fn draw_lane(&mut self, tab_height: i32, lane: usize, offset: i32, marked: bool) {
        let x = lane as i32 * LANE_WIDTH;
        let rect_height = tab_height + offset * LANE_OFFSET_Y;

        let fill = if marked { LANE_MARKED } else { LANE_COLOR };
        let rect_style = format!("{};fill:{}", THIN_STYLE, fill);
        let text_style = format!("{};text-anchor:middle", TEXT_STYLE);

        self.surface.rect(x, 0, LANE_WIDTH, rect_height, &rect_style);
        self.surface.text(
            x + LANE_WIDTH / 2,
            rect_height + FONT_SIZE,
            &TAB_LANES[lane..lane + 1],
            &text_style,
        );
    }

    /// Open the next measure: bar line, measure number, one symbol-height
    /// of breathing room.
    fn add_measure(&mut self) {
        let bar_y = self.current_y - MEASURE_THICKNESS / 2;
        let text_style = format!("{};dominant-baseline:central", TEXT_STYLE);
        let text_margin_left = 2;
        self.measure += 1;

        debug!(measure = self.measure, tab = self.cur_tab, "starting measure");
        self.surface.line(0, bar_y, TAB_WIDTH, bar_y, MEASURE_STYLE);
        self.surface.text(
            TAB_WIDTH + text_margin_left,
            bar_y,
            &self.measure.to_string(),
            &text_style,
        );

        self.tab_measures_left -= 1;
        self.current_y -= SYMBOL_HEIGHT;
    }

    /// X position of the lane carrying the given pitch.
    fn lane_x(&self, pitch: u8) -> Result<i32, LayoutError> {
        let index = PITCH_LANES
            .iter()
            .position(|&lane_pitch| lane_pitch == pitch)
            .ok_or(LayoutError::PitchOutOfRange(pitch))?;

        Ok(((index as f64 + 0.5) * LANE_WIDTH as f64).ceil() as i32)
    }

    /// Draw a note head without stem or taper, returning its x position.
    /// Half and whole notes are hollow, shorter ones are filled.
    fn draw_head(&mut self, note: &Note) -> Result<i32, LayoutError> {
        let note_x = self.lane_x(note.pitch)?;

        let hollow = matches!(note.duration.base, BaseLength::Half | BaseLength::Whole);
        let fill = if hollow { "white" } else { "black" };
        let style = format!("{};fill:{}", THIN_STYLE, fill);
        self.surface
            .circle(note_x, self.current_y, NOTE_RADIUS, &style);

        if note.duration.dotted {
            self.surface.circle(
                note_x + NOTE_RADIUS + 2,
                self.current_y - NOTE_RADIUS - 3,
                2,
                "fill:black",
            );
        }

        Ok(note_x)
    }

    /// Draw a stem from the gutter to the note head, plus the eighth-note
    /// beam bookkeeping. Only single notes are beam-eligible; an eighth
    /// chord always gets its own taper.
    fn draw_stem(&mut self, note_x: i32, base: BaseLength, beamable: bool) {
        if base == BaseLength::Whole {
            return;
        }

        let line_y = self.current_y - NOTE_RADIUS;
        self.surface.line(STEM_X, line_y, note_x, line_y, THIN_STYLE);

        if base != BaseLength::Eighth {
            return;
        }

        if !beamable {
            self.draw_taper(self.current_y);
        } else if let Some(pending_y) = self.pending_eighth.take() {
            // Second of a pair: connect the two stem ends.
            self.surface
                .line(STEM_X, line_y, STEM_X, pending_y - NOTE_RADIUS, THIN_STYLE);
        } else {
            self.pending_eighth = Some(self.current_y);
        }
    }

    /// The flag drawn on an eighth note that never found a beam partner.
    fn draw_taper(&mut self, y: i32) {
        self.surface.line(
            STEM_X,
            y - NOTE_RADIUS,
            STEM_X + 5,
            y - NOTE_RADIUS - 5,
            THIN_STYLE,
        );
    }

    fn flush_pending(&mut self) {
        if let Some(y) = self.pending_eighth.take() {
            self.draw_taper(y);
        }
    }

    fn place_note(&mut self, note: &Note) -> Result<(), LayoutError> {
        let note_x = self.draw_head(note)?;
        self.draw_stem(note_x, note.duration.base, true);
        Ok(())
    }

    /// All chord pitches share one y; the stem spans to the rightmost head.
    fn place_chord(&mut self, chord: &Chord) -> Result<(), LayoutError> {
        let mut rightmost_x = 0;

        for &pitch in &chord.pitches {
            let note_x = self.draw_head(&Note {
                duration: chord.duration,
                pitch,
            })?;
            rightmost_x = rightmost_x.max(note_x);
        }

        self.draw_stem(rightmost_x, chord.duration.base, false);
        Ok(())
    }

    /// Rest glyphs are selected by base length alone.
    fn place_rest(&mut self, rest: &Rest) {
        let y = self.current_y;

        match rest.duration.base {
            BaseLength::Whole => {
                // Block hanging right of the center line.
                self.surface.rect(
                    TAB_CENTER,
                    y - NOTE_RADIUS / 2,
                    NOTE_RADIUS / 2,
                    NOTE_RADIUS,
                    "fill:black",
                );
            }
            BaseLength::Half => {
                // Block hanging left of the center line.
                self.surface.rect(
                    TAB_CENTER - NOTE_RADIUS / 2,
                    y - NOTE_RADIUS / 2,
                    NOTE_RADIUS / 2,
                    NOTE_RADIUS,
                    "fill:black",
                );
            }
            BaseLength::Quarter => {
                // Squiggle running right from the center line.
                self.surface.polyline(
                    &[
                        TAB_CENTER,
                        TAB_CENTER + LANE_WIDTH / 2,
                        TAB_CENTER + LANE_WIDTH,
                        TAB_CENTER + LANE_WIDTH * 4 / 3,
                        TAB_CENTER + LANE_WIDTH * 5 / 3,
                        TAB_CENTER + 2 * LANE_WIDTH,
                    ],
                    &[
                        y,
                        y - LANE_WIDTH / 2,
                        y,
                        y - LANE_WIDTH / 2,
                        y,
                        y - LANE_WIDTH / 4,
                    ],
                    "stroke-width:2;stroke:black;fill:none",
                );
            }
            BaseLength::Eighth => {
                // Slash with a dot.
                self.surface.line(
                    TAB_CENTER + 3 * LANE_WIDTH / 2,
                    y - NOTE_RADIUS,
                    TAB_CENTER + 5 * LANE_WIDTH / 2,
                    y + NOTE_RADIUS,
                    "stroke-width:2;stroke:black;fill:none",
                );
                self.surface.circle(
                    TAB_CENTER + 7 * LANE_WIDTH / 4,
                    y + NOTE_RADIUS / 2,
                    NOTE_RADIUS * 3 / 4,
                    "fill:black",
                );
            }
        }
    }
}
