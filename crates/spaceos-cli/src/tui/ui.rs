//! Dashboard rendering: one bordered frame, three columns.
//!
//! ╔══════════════════════════════════════════════╗
//! ║ SPACE VEHICLE OPERATING SYSTEM               ║
//! ╠══════════════════════════════════════════════╣
//! ║ 12:34:56 | Date: 19 October 2026 | GMT +5 |… ║
//! ║ Power: WIRED | Speed: 12 km/h | Engine: 30%  ║
//! ╠══════════════════════════════════════════════╣
//! ║  SYSTEM STATUS │ MEMORY USAGE  │ NETWORK ... ║
//! ║  Engine: OK    │       **      │ State: ...  ║
//! ║  ...           │ ...           │    .  .     ║
//! ╠══════════════════════════════════════════════╣
//! ║ PACKET STATUS                                ║
//! ║ packet_3: 0% │ packet_8: 2% │ ...            ║
//! ╠══════════════════════════════════════════════╣
//! ║ CURRENT TASKS: None                          ║
//! ║ ENTER TASK: ____________________             ║
//! ║ 1234567890-+QWERTYUIOP[]ASDFGHJKL;'ZXCVBNM<> ║
//! ╚══════════════════════════════════════════════╝
//! Press Ctrl+C to exit
//!
//! Every line is built as spans and fitted to the frame width: boxed lines
//! are exactly `width` columns wide with the right border in the last
//! column, and anything that does not fit is truncated.

use chrono::{DateTime, FixedOffset};
use ratatui::{prelude::*, widgets::Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use spaceos_core::{MetricSeries, VehicleTelemetry};

use super::art;

pub const TITLE: &str = " SPACE VEHICLE OPERATING SYSTEM ";
pub const KEYBOARD: &str = " 1234567890-+QWERTYUIOP[]ASDFGHJKL;'ZXCVBNM<>/ ";
pub const HELP: &str = "Press Ctrl+C to exit";

/// Underscores in the task input placeholder.
pub const TASK_INPUT_WIDTH: usize = 20;

const GRAPH_HEIGHT: usize = 5;
const GLOBE_SIZE: usize = 8;

type Cell = Vec<Span<'static>>;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Colors for each role in the frame, or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    pub const fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn fg(self, color: Color) -> Style {
        if self.colored {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    fn border(self) -> Style {
        self.fg(Color::Magenta)
    }

    fn title(self) -> Style {
        self.fg(Color::Blue)
    }

    fn heading(self) -> Style {
        self.fg(Color::Cyan)
    }

    fn text(self) -> Style {
        self.fg(Color::White)
    }

    fn status(self, good: bool) -> Style {
        self.fg(if good { Color::Green } else { Color::Red })
    }
}

/// Everything one frame depends on.
pub struct View<'a> {
    pub telemetry: &'a VehicleTelemetry,
    pub now: DateTime<FixedOffset>,
    pub location: &'a str,
    pub palette: Palette,
}

pub fn draw(f: &mut Frame, view: &View) {
    let area = f.area();
    let lines = frame_lines(view, area.width as usize);
    f.render_widget(Paragraph::new(lines), area);
}

/// Build the full frame for a terminal `width` columns wide. Rows beyond the
/// terminal height are clipped by the caller.
pub fn frame_lines(view: &View, width: usize) -> Vec<Line<'static>> {
    let p = view.palette;
    let vehicle = &view.telemetry.vehicle;
    let divider = || rule("╠", "╣", width, p);

    let mut lines = Vec::with_capacity(32);

    lines.push(rule("╔", "╗", width, p));
    lines.push(boxed(vec![Span::styled(TITLE, p.title())], width, p));
    lines.push(divider());
    lines.push(boxed(
        vec![
            Span::styled(format!(" {} ", view.now.format("%H:%M:%S")), p.heading()),
            Span::styled(
                format!(
                    "| Date: {} | {} | {}",
                    view.now.format("%d %B %Y"),
                    gmt_label(view.now.offset()),
                    view.location
                ),
                p.text(),
            ),
        ],
        width,
        p,
    ));
    lines.push(boxed(
        vec![
            Span::styled(format!(" Power: {} ", vehicle.power_source), p.heading()),
            Span::styled(
                format!(
                    "| Speed: {} km/h | Engine: {}%",
                    vehicle.speed, vehicle.engine_usage
                ),
                p.text(),
            ),
        ],
        width,
        p,
    ));
    lines.push(divider());

    lines.extend(body_rows(view, width));

    lines.push(divider());
    lines.push(boxed(
        vec![
            Span::styled(" PACKET STATUS ", p.heading()),
            Span::styled("(loss per channel)", p.text()),
        ],
        width,
        p,
    ));
    lines.push(boxed(packet_strip(view), width, p));

    lines.push(divider());
    lines.push(boxed(
        vec![
            Span::styled(" CURRENT TASKS: ", p.heading()),
            Span::styled(vehicle.current_task.clone(), p.text()),
        ],
        width,
        p,
    ));
    lines.push(boxed(
        vec![
            Span::styled(" ENTER TASK: ", p.heading()),
            Span::styled("_".repeat(TASK_INPUT_WIDTH), p.text()),
        ],
        width,
        p,
    ));
    lines.push(boxed(vec![Span::styled(KEYBOARD, p.heading())], width, p));
    lines.push(rule("╚", "╝", width, p));
    lines.push(Line::from(Span::styled(truncate(HELP, width), p.text())));

    lines
}

/// `GMT +5`, `GMT -3:30`, `GMT +0`.
pub fn gmt_label(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    let (hours, minutes) = (abs / 3600, abs % 3600 / 60);
    if minutes == 0 {
        format!("GMT {sign}{hours}")
    } else {
        format!("GMT {sign}{hours}:{minutes:02}")
    }
}

// ---------------------------------------------------------------------------
// Body columns
// ---------------------------------------------------------------------------

fn body_rows(view: &View, width: usize) -> Vec<Line<'static>> {
    let p = view.palette;
    let col = width.saturating_sub(6) / 3;

    let mut columns = [
        status_column(view),
        graph_column(view, col),
        network_column(view),
    ];
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    for column in &mut columns {
        column.resize_with(height, Vec::new);
    }

    let [status, graphs, network] = columns;
    status
        .into_iter()
        .zip(graphs)
        .zip(network)
        .map(|((a, b), c)| {
            let mut inner = vec![Span::raw(" ")];
            inner.extend(fit(a, col));
            inner.push(Span::styled("│", p.border()));
            inner.extend(fit(b, col));
            inner.push(Span::styled("│", p.border()));
            inner.extend(fit(c, col));
            boxed(inner, width, p)
        })
        .collect()
}

fn status_column(view: &View) -> Vec<Cell> {
    let p = view.palette;
    let mut cells = vec![vec![Span::styled(" SYSTEM STATUS ", p.heading())]];
    for subsystem in view.telemetry.subsystems.iter() {
        let label = if subsystem.operational { "OK" } else { "FAIL" };
        cells.push(vec![
            Span::styled(format!(" {}: ", subsystem.name), p.text()),
            Span::styled(label, p.status(subsystem.operational)),
        ]);
    }
    cells
}

fn graph_column(view: &View, col: usize) -> Vec<Cell> {
    let p = view.palette;
    let t = view.telemetry;
    let mut cells = Vec::new();

    for (title, series) in [(" MEMORY USAGE ", &t.memory), (" NETWORK TRAFFIC ", &t.network)] {
        if !cells.is_empty() {
            cells.push(Vec::new());
        }
        cells.push(vec![Span::styled(title, p.heading())]);
        for row in art::ascii_graph(&series.to_vec(), GRAPH_HEIGHT) {
            cells.push(vec![Span::styled(format!(" {row}"), p.text())]);
        }
        cells.push(reading(series, col, p));
    }
    cells
}

/// Latest sample as a percentage followed by a gauge filling the column.
fn reading(series: &MetricSeries, col: usize, p: Palette) -> Cell {
    let value = series.last();
    let label = format!(" {value:>3}% ");
    let bar = art::ascii_bar(value, col.saturating_sub(label.len() + 1));
    vec![Span::styled(label, p.text()), Span::styled(bar, p.heading())]
}

fn network_column(view: &View) -> Vec<Cell> {
    let p = view.palette;
    let vehicle = &view.telemetry.vehicle;
    let labeled = |label: &'static str, value: String| {
        vec![Span::styled(label, p.text()), Span::styled(value, p.status(true))]
    };

    let mut cells = vec![
        vec![Span::styled(" NETWORK STATUS ", p.heading())],
        labeled(" State: ", vehicle.link_state.clone()),
        labeled(" Ping: ", vehicle.ping.clone()),
        labeled(" ID: ", vehicle.system_id.to_string()),
        Vec::new(),
    ];
    cells.extend(
        art::ascii_globe(GLOBE_SIZE)
            .into_iter()
            .map(|row| vec![Span::styled(row, p.text())]),
    );
    cells
}

fn packet_strip(view: &View) -> Cell {
    let p = view.palette;
    let mut spans = vec![Span::raw(" ")];
    for (i, channel) in view.telemetry.packets.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", p.text()));
        }
        spans.push(Span::styled(format!("{}: ", channel.name), p.text()));
        spans.push(Span::styled(
            format!("{}%", channel.loss),
            p.status(channel.loss == 0),
        ));
    }
    spans
}

// ---------------------------------------------------------------------------
// Width fitting
// ---------------------------------------------------------------------------

/// Horizontal border: `left`, a run of `═`, `right`.
fn rule(left: &str, right: &str, width: usize, p: Palette) -> Line<'static> {
    if width < 2 {
        return Line::from(Span::styled(truncate(left, width), p.border()));
    }
    Line::from(Span::styled(
        format!("{left}{}{right}", "═".repeat(width - 2)),
        p.border(),
    ))
}

/// `║` + `inner` fitted to `width - 2` + `║`.
fn boxed(inner: Cell, width: usize, p: Palette) -> Line<'static> {
    if width < 2 {
        return Line::from(fit(vec![Span::styled("║", p.border())], width));
    }
    let mut spans = vec![Span::styled("║", p.border())];
    spans.extend(fit(inner, width - 2));
    spans.push(Span::styled("║", p.border()));
    Line::from(spans)
}

/// Truncate or pad `spans` to exactly `width` display columns.
fn fit(spans: Cell, width: usize) -> Cell {
    let mut out = Vec::with_capacity(spans.len() + 1);
    let mut used = 0;

    for span in spans {
        let room = width - used;
        if room == 0 {
            break;
        }
        let w = span.width();
        if w <= room {
            used += w;
            out.push(span);
        } else {
            let text = truncate(&span.content, room);
            used += text.width();
            out.push(Span::styled(text, span.style));
            break;
        }
    }

    if used < width {
        out.push(Span::raw(" ".repeat(width - used)));
    }
    out
}

/// Longest prefix of `s` that fits in `width` display columns.
fn truncate(s: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}
