//! HTML fragments for the built-in screens.

/// Escape text destined for HTML content or attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A screen: heading, rule, content.
pub fn screen(heading: &str, content: &str) -> String {
    format!("<h1>{}</h1><hr>{}", escape(heading), content)
}

pub fn span(id: &str, content: &str) -> String {
    format!("<span id=\"{}\">{}</span>", id, escape(content))
}

pub fn notification(text: &str) -> String {
    format!("<p class=\"notification\">{}</p>", span("notif", text))
}

pub fn href_button(href: &str, id: &str, content: &str) -> String {
    format!(
        "<a href=\"{}\"><button type=\"button\" id=\"{}\"> {} </button></a>",
        href, id, content
    )
}

pub fn submit_button(id: &str, content: &str) -> String {
    format!("<button id=\"{}\" type=\"submit\"> {} </button>", id, content)
}

pub fn input_field(id_and_name: &str, placeholder: &str, required: bool) -> String {
    format!(
        "<input id=\"{}\" name=\"{}\" type=\"text\" placeholder=\"{}\" {}/>",
        id_and_name,
        id_and_name,
        placeholder,
        if required { "required " } else { " " }
    )
}

pub fn post_form(id: &str, action: &str) -> String {
    format!(
        "<form id=\"{}\" method=\"POST\" action=\"{}\">",
        id, action
    )
}

pub fn text_area(id_and_name: &str, placeholder: &str, rows: u32, cols: u32) -> String {
    format!(
        "<textarea id=\"{}\" name=\"{}\" placeholder=\"{}\" rows=\"{}\" cols=\"{}\"></textarea>",
        id_and_name, id_and_name, placeholder, rows, cols
    )
}
