//! Server-rendered HTML pages

use axum::response::Html;

use crate::models::{FieldErrors, LocationType, RecordForm, RecordQuery, WeatherRecord};

/// Banner shown on the record list after a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Created,
    Updated,
    Deleted,
}

impl Notice {
    pub fn code(&self) -> &'static str {
        match self {
            Notice::Created => "created",
            Notice::Updated => "updated",
            Notice::Deleted => "deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Notice::Created),
            "updated" => Some(Notice::Updated),
            "deleted" => Some(Notice::Deleted),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::Created => "Weather record created successfully with real weather data!",
            Notice::Updated => "Weather record updated successfully with fresh weather data!",
            Notice::Deleted => "Weather record deleted successfully!",
        }
    }
}

/// Which form is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Update(i64),
}

impl FormAction {
    fn title(&self) -> &'static str {
        match self {
            FormAction::Create => "Create",
            FormAction::Update(_) => "Update",
        }
    }

    fn target(&self) -> String {
        match self {
            FormAction::Create => "/records/create/".to_string(),
            FormAction::Update(id) => format!("/records/{}/update/", id),
        }
    }
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, banner: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Weather Records</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/records/">Records</a> | <a href="/records/create/">New record</a> | <a href="/swagger-ui">API</a></nav>
<main>
{banner}{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        banner = banner,
        body = body,
    ))
}

fn success_banner(notice: Option<Notice>) -> String {
    notice
        .map(|n| format!("<div class=\"alert alert-success\">{}</div>\n", n.message()))
        .unwrap_or_default()
}

fn error_banner(message: Option<&str>) -> String {
    message
        .map(|m| format!("<div class=\"alert alert-danger\">{}</div>\n", escape(m)))
        .unwrap_or_default()
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| escape(&v.to_string()))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn home() -> Html<String> {
    layout(
        "Home",
        "",
        r#"<h1>Weather Records</h1>
<p>Look up the weather anywhere and keep summaries of past or upcoming date ranges.</p>
<form id="lookup">
<input type="text" name="location" placeholder="City, zip code, landmark or coordinates" required>
<button type="submit">Get weather</button>
</form>
<pre id="result"></pre>
<ul>
<li><a href="/records/">Browse saved records</a></li>
<li>Export: <a href="/export/json/">JSON</a> <a href="/export/csv/">CSV</a> <a href="/export/pdf/">PDF</a> <a href="/export/excel/">Excel</a> <a href="/export/markdown/">Markdown</a></li>
</ul>
<script>
document.getElementById("lookup").addEventListener("submit", async (event) => {
  event.preventDefault();
  const location = new FormData(event.target).get("location");
  const response = await fetch("/api/weather/", {
    method: "POST",
    headers: {"Content-Type": "application/json"},
    body: JSON.stringify({location}),
  });
  document.getElementById("result").textContent = JSON.stringify(await response.json(), null, 2);
});
</script>
"#,
    )
}

fn page_link(query: &RecordQuery, page: i64, label: &str) -> String {
    let mut href = format!("/records/?page={}", page);
    if let Some(term) = query.search_term() {
        href.push_str("&search=");
        href.push_str(&urlencoding::encode(term));
    }
    format!("<a href=\"{}\">{}</a>", escape(&href), label)
}

pub fn record_list(records: &[WeatherRecord], total: i64, query: &RecordQuery) -> Html<String> {
    let notice = query.notice.as_deref().and_then(Notice::from_code);
    let search = query.search_term().unwrap_or_default();

    let mut body = format!(
        r#"<h1>Weather Records</h1>
<form method="get" action="/records/">
<input type="text" name="search" value="{}" placeholder="Search location, description or notes">
<button type="submit">Search</button>
</form>
"#,
        escape(search)
    );

    if records.is_empty() {
        body.push_str("<p>No weather records found.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Location</th><th>Dates</th><th>Temperature</th>\
             <th>Humidity</th><th>Description</th><th></th></tr></thead>\n<tbody>\n",
        );
        for record in records {
            body.push_str(&format!(
                "<tr><td><a href=\"/records/{id}/\">{name}</a></td><td>{start} to {end}</td>\
                 <td>{range}</td><td>{humidity}</td><td>{description}</td>\
                 <td><a href=\"/records/{id}/update/\">Edit</a> <a href=\"/records/{id}/delete/\">Delete</a></td></tr>\n",
                id = record.id,
                name = escape(&record.location_name),
                start = record.start_date,
                end = record.end_date,
                range = escape(&record.temperature_range()),
                humidity = record
                    .humidity
                    .map(|h| format!("{}%", h))
                    .unwrap_or_else(|| "N/A".to_string()),
                description = or_na(record.description.as_deref()),
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    let page = query.page();
    let pages = ((total + query.per_page() - 1) / query.per_page()).max(1);
    body.push_str("<div class=\"pagination\">");
    if page > 1 {
        body.push_str(&page_link(query, page - 1, "&laquo; Previous"));
        body.push(' ');
    }
    body.push_str(&format!("Page {} of {} ({} records)", page, pages, total));
    if page < pages {
        body.push(' ');
        body.push_str(&page_link(query, page + 1, "Next &raquo;"));
    }
    body.push_str("</div>\n");

    layout("Records", &success_banner(notice), &body)
}

fn field_errors(errors: &FieldErrors, field: &str) -> String {
    let messages = errors.get(field);
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!("<ul class=\"errorlist\">{}</ul>", items)
}

fn input(form_errors: &FieldErrors, name: &str, label: &str, kind: &str, value: &str) -> String {
    format!(
        "<p><label for=\"id_{name}\">{label}</label> \
         <input type=\"{kind}\" name=\"{name}\" id=\"id_{name}\" value=\"{value}\">{errors}</p>\n",
        name = name,
        label = label,
        kind = kind,
        value = escape(value),
        errors = field_errors(form_errors, name),
    )
}

pub fn record_form(
    action: FormAction,
    form: &RecordForm,
    errors: &FieldErrors,
    flash: Option<&str>,
) -> Html<String> {
    let options: String = LocationType::ALL
        .iter()
        .map(|t| {
            let selected = if t.as_str() == form.location_type
                || (form.location_type.is_empty() && *t == LocationType::default())
            {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                t.as_str(),
                selected,
                t.label()
            )
        })
        .collect();

    let mut body = format!(
        "<h1>{} Weather Record</h1>\n<form method=\"post\" action=\"{}\">\n",
        action.title(),
        action.target()
    );
    body.push_str(&input(errors, "location_name", "Location", "text", &form.location_name));
    body.push_str(&format!(
        "<p><label for=\"id_location_type\">Location type</label> \
         <select name=\"location_type\" id=\"id_location_type\">{}</select>{}</p>\n",
        options,
        field_errors(errors, "location_type")
    ));
    body.push_str(&input(errors, "start_date", "Start date", "date", &form.start_date));
    body.push_str(&input(errors, "end_date", "End date", "date", &form.end_date));

    let optional = [
        ("latitude", "Latitude", &form.latitude),
        ("longitude", "Longitude", &form.longitude),
        ("temperature_min", "Minimum temperature (°C)", &form.temperature_min),
        ("temperature_max", "Maximum temperature (°C)", &form.temperature_max),
        ("temperature_avg", "Average temperature (°C)", &form.temperature_avg),
        ("humidity", "Humidity (%)", &form.humidity),
        ("pressure", "Pressure (hPa)", &form.pressure),
        ("wind_speed", "Wind speed (m/s)", &form.wind_speed),
        ("wind_direction", "Wind direction", &form.wind_direction),
        ("description", "Description", &form.description),
        ("icon", "Icon", &form.icon),
        ("precipitation", "Precipitation (mm)", &form.precipitation),
        ("visibility", "Visibility (km)", &form.visibility),
        ("uv_index", "UV index", &form.uv_index),
    ];
    for (name, label, value) in optional {
        body.push_str(&input(errors, name, label, "text", value));
    }

    body.push_str(&format!(
        "<p><label for=\"id_notes\">Notes</label> \
         <textarea name=\"notes\" id=\"id_notes\">{}</textarea>{}</p>\n",
        escape(&form.notes),
        field_errors(errors, "notes")
    ));
    body.push_str(&format!(
        "<button type=\"submit\">{}</button> <a href=\"/records/\">Cancel</a>\n</form>\n",
        action.title()
    ));

    layout(
        &format!("{} record", action.title()),
        &error_banner(flash),
        &body,
    )
}

pub fn record_detail(record: &WeatherRecord) -> Html<String> {
    let rows = [
        ("Location type", record.location_type.label().to_string()),
        ("Latitude", or_na(record.latitude)),
        ("Longitude", or_na(record.longitude)),
        (
            "Date range",
            format!("{} to {}", record.start_date, record.end_date),
        ),
        ("Duration", format!("{} days", record.duration_days())),
        ("Temperature", escape(&record.temperature_range())),
        ("Humidity", or_na(record.humidity.map(|h| format!("{}%", h)))),
        ("Pressure", or_na(record.pressure.map(|p| format!("{} hPa", p)))),
        ("Wind speed", or_na(record.wind_speed.map(|w| format!("{} m/s", w)))),
        ("Wind direction", or_na(record.wind_direction.as_deref())),
        ("Description", or_na(record.description.as_deref())),
        ("Precipitation", or_na(record.precipitation.map(|p| format!("{} mm", p)))),
        ("Visibility", or_na(record.visibility.map(|v| format!("{} km", v)))),
        ("UV index", or_na(record.uv_index)),
        ("Notes", escape(&record.notes)),
        ("Created", record.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ("Updated", record.updated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    ];

    let mut body = format!("<h1>{}</h1>\n<dl>\n", escape(&record.location_name));
    for (label, value) in rows {
        body.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", label, value));
    }
    body.push_str(&format!(
        "</dl>\n<p><a href=\"/records/{id}/update/\">Edit</a> | \
         <a href=\"/records/{id}/delete/\">Delete</a> | <a href=\"/records/\">Back to list</a></p>\n",
        id = record.id
    ));

    layout(&record.label(), "", &body)
}

pub fn record_confirm_delete(record: &WeatherRecord) -> Html<String> {
    let body = format!(
        "<h1>Delete Weather Record</h1>\n\
         <p>Are you sure you want to delete \"{label}\"?</p>\n\
         <form method=\"post\" action=\"/records/{id}/delete/\">\n\
         <button type=\"submit\">Yes, delete</button> <a href=\"/records/{id}/\">Cancel</a>\n\
         </form>\n",
        label = escape(&record.label()),
        id = record.id
    );
    layout("Delete record", "", &body)
}
