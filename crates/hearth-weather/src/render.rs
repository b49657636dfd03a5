//! Pure mapping from panel state to a display tree.

use hearth_core::{DisplayNode, PanelHost, WeatherSettings};

use crate::types::{CurrentDisplay, ForecastDayDisplay, PanelState};

/// Build the panel's display tree.
///
/// Three mutually exclusive branches: missing credential, still loading,
/// and loaded weather data.
pub fn render_panel(
    settings: &WeatherSettings,
    state: &PanelState,
    host: &dyn PanelHost,
) -> DisplayNode {
    if !settings.has_api_key() {
        return DisplayNode::new()
            .class("dimmed light small")
            .text("Please set the weather provider api_key in the config for the weather panel.");
    }

    let Some(current) = state.current.as_ref().filter(|_| state.loaded) else {
        return DisplayNode::new()
            .class("dimmed light small")
            .text(host.translate("LOADING"));
    };

    DisplayNode::new()
        .class("weather")
        .child(current_block(current))
        .child(forecast_block(&state.forecast))
}

fn current_block(current: &CurrentDisplay) -> DisplayNode {
    let info = DisplayNode::new()
        .class("info semi-bright light")
        .child(info_row("Max", &current.max_temp, "°"))
        .child(info_row("Min", &current.min_temp, "°"))
        .child(info_row("Rain", &current.rain, "mm"));

    DisplayNode::new()
        .class("current")
        .child(icon_node(current.icon.as_deref()))
        .child(
            DisplayNode::new()
                .class("temp bright light")
                .text(format!("{}°", current.temp)),
        )
        .child(info)
}

fn forecast_block(days: &[ForecastDayDisplay]) -> DisplayNode {
    DisplayNode::new()
        .class("forecast")
        .children(days.iter().map(|day| {
            DisplayNode::new()
                .class("forecast-day")
                .child(
                    DisplayNode::new()
                        .class("day semi-bright small")
                        .text(day.day.clone()),
                )
                .child(icon_node(day.icon.as_deref()))
                .child(
                    DisplayNode::new()
                        .class("temp-range semi-bright small")
                        .text(format!("{}° - {}°", day.max_temp, day.min_temp)),
                )
        }))
}

fn icon_node(icon: Option<&str>) -> DisplayNode {
    let node = DisplayNode::new().class("icon wu wu-white");
    match icon {
        Some(class) => node.class(class),
        None => node,
    }
}

fn info_row(label: &str, value: &str, unit: &str) -> DisplayNode {
    DisplayNode::new()
        .class("info-row")
        .child(DisplayNode::new().class("type").text(format!("{}:", label)))
        .child(DisplayNode::new().text(value))
        .child(DisplayNode::new().class("unit").text(unit))
}
