//! HTML rendering for the form page

use crate::models::*;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; color: #222; }
h1 { text-align: center; color: #1a73e8; }
.subtitle { text-align: center; font-size: 18px; }
.columns { display: flex; gap: 2rem; }
.columns > div { flex: 1; }
label { display: block; margin-top: .8rem; font-weight: 600; }
input, select { width: 100%; padding: .3rem; }
button { margin-top: 1.2rem; padding: .5rem 1.2rem; }
.result { background: #e6f4ea; padding: 1rem; border-radius: 6px; font-size: 1.3rem; }
.error { background: #fce8e6; padding: 1rem; border-radius: 6px; }
pre { background: #f5f5f5; padding: 1rem; }
.footer { text-align: center; color: gray; }
"#;

/// Outcome of the last submission, if any
pub enum Outcome<'a> {
    None,
    Scored { score: f64, record: &'a ScenarioRecord },
    Rejected(&'a str),
}

pub fn render_page(values: &ScenarioRecord, outcome: Outcome<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Climate &amp; Accident Prediction</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    html.push_str("<h1>Climate &amp; Road Accident Impact Prediction</h1>\n");
    html.push_str(
        "<p class=\"subtitle\">Predict road accident risk based on environmental &amp; driving conditions</p>\n<hr>\n",
    );

    if let Outcome::Rejected(message) = &outcome {
        html.push_str(&format!("<div class=\"error\">{}</div>\n", escape(message)));
    }

    html.push_str(&render_form(values));

    if let Outcome::Scored { score, record } = &outcome {
        html.push_str(&format!(
            "<hr>\n<div class=\"result\">Predicted Accident Impact Score: <strong>{:.2}</strong></div>\n",
            score
        ));
        let echo = serde_json::to_string_pretty(record).unwrap_or_default();
        html.push_str(&format!("<pre>{}</pre>\n", escape(&echo)));
        html.push_str(
            "<hr>\n<p class=\"footer\">Real-time prediction powered by Machine Learning</p>\n",
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(v: &ScenarioRecord) -> String {
    let left = [
        number("Driver_Age", "Driver Age", v.driver_age, 16, 90),
        number("Driver_Experience", "Driver Experience (Years)", v.driver_experience, 0, 50),
        number("Number_of_Vehicles", "Number of Vehicles", v.number_of_vehicles, 1, 10),
        number("Speed_Limit", "Speed Limit", v.speed_limit, 10, 200),
        select(
            "Driver_Alcohol",
            "Driver Alcohol",
            &[("0", "No"), ("1", "Yes")],
            &v.driver_alcohol.to_string(),
        ),
        select(
            "Traffic_Density",
            "Traffic Density",
            &[("1", "Low"), ("2", "Medium"), ("3", "High")],
            &v.traffic_density.to_string(),
        ),
    ]
    .concat();

    let right = [
        enum_select("Time_of_Day", "Time of Day", TimeOfDay::ALL, v.time_of_day),
        enum_select("Road_Type", "Road Type", RoadType::ALL, v.road_type),
        enum_select("Vehicle_Type", "Vehicle Type", VehicleType::ALL, v.vehicle_type),
        enum_select("Road_Condition", "Road Condition", RoadCondition::ALL, v.road_condition),
        enum_select(
            "Road_Light_Condition",
            "Light Condition",
            LightCondition::ALL,
            v.road_light_condition,
        ),
        enum_select(
            "Accident_Severity",
            "Accident Severity",
            AccidentSeverity::ALL,
            v.accident_severity,
        ),
        enum_select("Weather", "Weather", Weather::ALL, v.weather),
    ]
    .concat();

    format!(
        "<h2>Enter Scenario Details</h2>\n<form method=\"post\" action=\"/\">\n\
         <div class=\"columns\">\n<div>\n{}</div>\n<div>\n{}</div>\n</div>\n\
         <button type=\"submit\">Predict</button>\n</form>\n",
        left, right
    )
}

fn number(name: &str, label: &str, value: i32, min: i32, max: i32) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" value=\"{value}\" min=\"{min}\" max=\"{max}\" step=\"1\" required>\n"
    )
}

fn select(name: &str, label: &str, options: &[(&str, &str)], selected: &str) -> String {
    let mut html = format!("<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n");
    for (value, text) in options {
        let mark = if *value == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape(value),
            mark,
            escape(text)
        ));
    }
    html.push_str("</select>\n");
    html
}

fn enum_select<T: Copy + PartialEq + std::fmt::Display>(
    name: &str,
    label: &str,
    all: &[T],
    selected: T,
) -> String {
    let labels: Vec<String> = all.iter().map(|v| v.to_string()).collect();
    let options: Vec<(&str, &str)> = labels.iter().map(|l| (l.as_str(), l.as_str())).collect();
    select(name, label, &options, &selected.to_string())
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
