use crate::core::stats::SeriesPoint;
use crate::render::{el, Element, Node};

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 300.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 50.0;
const MARGIN_LEFT: f64 = 70.0;
const PADDING: f64 = 0.1;
const Y_TICKS: u32 = 5;

const PLOT_WIDTH: f64 = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
const PLOT_HEIGHT: f64 = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rounds `max` up to 1, 2, 5 or 10 times a power of ten.
pub fn nice_max(max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .find(|step| step * magnitude >= max)
        .unwrap_or(10.0);
    step * magnitude
}

/// Band layout for the plot area: equal slots, `PADDING` of each slot left
/// empty, heights scaled against the rounded maximum.
pub fn layout(data: &[SeriesPoint]) -> Vec<Bar> {
    if data.is_empty() {
        return Vec::new();
    }
    let top = nice_max(data.iter().map(|p| p.value).fold(0.0, f64::max));
    let step = PLOT_WIDTH / (data.len() as f64 + PADDING);
    let width = step * (1.0 - PADDING);

    data.iter()
        .enumerate()
        .map(|(i, point)| {
            let height = (point.value.max(0.0) / top) * PLOT_HEIGHT;
            Bar {
                x: step * PADDING + step * i as f64,
                y: PLOT_HEIGHT - height,
                width,
                height,
            }
        })
        .collect()
}

fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

fn label(x: f64, y: f64, value: &str) -> Element {
    el("text")
        .attr("x", num(x))
        .attr("y", num(y))
        .attr("text-anchor", "middle")
        .text(value)
}

fn gradient(id: &str) -> Node {
    el("defs")
        .child(
            el("linearGradient")
                .id(id)
                .attr("x1", "0%")
                .attr("y1", "0%")
                .attr("x2", "0%")
                .attr("y2", "100%")
                .child(el("stop").attr("offset", "0%").attr("stop-color", "#6366F1"))
                .child(el("stop").attr("offset", "100%").attr("stop-color", "#4338CA")),
        )
        .into()
}

fn y_axis(top: f64) -> Node {
    let mut axis = el("g").class("y axis").child(
        el("line")
            .attr("x1", "0")
            .attr("y1", "0")
            .attr("x2", "0")
            .attr("y2", num(PLOT_HEIGHT))
            .attr("stroke", "currentColor"),
    );
    for tick in 0..=Y_TICKS {
        let value = top * tick as f64 / Y_TICKS as f64;
        let y = PLOT_HEIGHT - PLOT_HEIGHT * tick as f64 / Y_TICKS as f64;
        axis = axis.child(
            el("text")
                .attr("x", "-6")
                .attr("y", num(y))
                .attr("dy", "0.32em")
                .attr("text-anchor", "end")
                .attr("font-size", "10")
                .text(num(value)),
        );
    }
    axis.into()
}

fn x_axis(data: &[SeriesPoint], bars: &[Bar]) -> Node {
    let mut axis = el("g")
        .class("x axis")
        .attr("transform", format!("translate(0,{})", num(PLOT_HEIGHT)))
        .child(
            el("line")
                .attr("x1", "0")
                .attr("y1", "0")
                .attr("x2", num(PLOT_WIDTH))
                .attr("y2", "0")
                .attr("stroke", "currentColor"),
        );
    for (point, bar) in data.iter().zip(bars) {
        let x = bar.x + bar.width / 2.0;
        axis = axis.child(
            el("text")
                .attr("transform", format!("translate({},9) rotate(-45)", num(x)))
                .attr("text-anchor", "end")
                .attr("font-size", "10")
                .text(point.label.as_str()),
        );
    }
    axis.into()
}

/// Static SVG bar chart: title, axis labels, gradient-filled bars.
pub fn bar_chart(id: &str, data: &[SeriesPoint], title: &str, x_label: &str, y_label: &str) -> Node {
    let gradient_id = format!("{}-gradient", id);
    let top = nice_max(data.iter().map(|p| p.value).fold(0.0, f64::max));
    let bars = layout(data);

    let plot = el("g")
        .attr("transform", format!("translate({},{})", num(MARGIN_LEFT), num(MARGIN_TOP)))
        .child(gradient(&gradient_id))
        .child(x_axis(data, &bars))
        .child(y_axis(top))
        .children(data.iter().zip(&bars).map(|(point, bar)| {
            el("rect")
                .class("bar")
                .attr("x", num(bar.x))
                .attr("y", num(bar.y))
                .attr("width", num(bar.width))
                .attr("height", num(bar.height))
                .attr("fill", format!("url(#{})", gradient_id))
                .child(el("title").text(format!("{}: {}", point.label, num(point.value))))
        }))
        .child(
            label(PLOT_WIDTH / 2.0, PLOT_HEIGHT + MARGIN_BOTTOM - 5.0, x_label)
                .class("x label")
                .attr("font-size", "14"),
        )
        .child(
            label(-PLOT_HEIGHT / 2.0, -MARGIN_LEFT + 20.0, y_label)
                .class("y label")
                .attr("dy", ".75em")
                .attr("transform", "rotate(-90)")
                .attr("font-size", "14"),
        )
        .child(
            label(PLOT_WIDTH / 2.0, -MARGIN_TOP / 2.0, title)
                .attr("font-size", "18")
                .attr("font-weight", "bold"),
        );

    el("div")
        .id(id)
        .class("flex justify-center items-center")
        .child(
            el("svg")
                .attr("xmlns", "http://www.w3.org/2000/svg")
                .attr("width", num(WIDTH))
                .attr("height", num(HEIGHT))
                .attr("viewBox", format!("0 0 {} {}", num(WIDTH), num(HEIGHT)))
                .child(plot),
        )
        .into()
}
