//! HTML templates for the grid admin pages.
//!
//! Plain string templates with HTMX for fragment swaps; no template engine.

use rowforge_core::descriptor::{EntityDescriptor, FieldKind};
use rowforge_core::record::Record;
use rowforge_forms::{ActionKind, Crumb, Form, FormField, FormView, MessageKind};

/// Base HTML layout wrapper.
pub fn layout(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Rowforge</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; background: #f7f7f8; }}
        header {{ background: #1f2937; color: #fff; padding: 0.75rem 1.5rem; }}
        header a {{ color: #fff; text-decoration: none; font-weight: 600; }}
        main {{ max-width: 56rem; margin: 1.5rem auto; padding: 0 1rem; }}
        nav.crumbs {{ font-size: 0.875rem; margin-bottom: 1rem; color: #6b7280; }}
        nav.crumbs a {{ color: #2563eb; text-decoration: none; }}
        .message {{ padding: 0.5rem 0.75rem; border-radius: 0.25rem; margin-bottom: 1rem; }}
        .message.good {{ background: #dcfce7; color: #166534; }}
        .message.bad {{ background: #fee2e2; color: #991b1b; }}
        form.detail label {{ display: block; margin: 0.75rem 0 0.25rem; font-weight: 600; }}
        form.detail input[type=text], form.detail input[type=number],
        form.detail textarea, form.detail select {{ width: 100%; padding: 0.4rem; }}
        .actions {{ margin-top: 1.25rem; display: flex; gap: 0.5rem; }}
        .actions button {{ padding: 0.4rem 1rem; }}
        table {{ border-collapse: collapse; width: 100%; background: #fff; }}
        th, td {{ text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e5e7eb; }}
    </style>
</head>
<body>
    <header><a href="/">Rowforge</a></header>
    <main>
        {content}
    </main>
</body>
</html>"##,
        title = html_escape(title),
        content = content,
    )
}

/// Breadcrumb trail; the last crumb is the current page.
pub fn breadcrumbs(crumbs: &[Crumb]) -> String {
    let parts: Vec<String> = crumbs
        .iter()
        .map(|crumb| match &crumb.link {
            Some(link) => format!(
                r#"<a href="{}">{}</a>"#,
                html_escape(link),
                html_escape(&crumb.title)
            ),
            None => html_escape(&crumb.title),
        })
        .collect();
    format!(
        r#"<nav class="crumbs">{}</nav>"#,
        parts.join(" &raquo; ")
    )
}

/// The detail form as a swappable fragment: message, fields, actions.
pub fn form_fragment(form: &Form, post_url: &str, delete_url: &str) -> String {
    let mut out = String::new();

    if let Some(message) = &form.message {
        let class = match message.kind {
            MessageKind::Good => "good",
            MessageKind::Bad => "bad",
        };
        out.push_str(&format!(
            r#"<div class="message {}">{}</div>"#,
            class,
            html_escape(&message.text)
        ));
    }

    out.push_str(&format!(
        r#"<form class="detail" id="{id}" method="post" action="{action}" hx-post="{action}" hx-target="this" hx-swap="outerHTML">"#,
        id = html_escape(&form.name),
        action = html_escape(post_url),
    ));

    for field in &form.fields {
        out.push_str(&field_html(field));
    }

    out.push_str(r#"<div class="actions">"#);
    for action in &form.actions {
        let disabled = if action.enabled { "" } else { " disabled" };
        match action.kind {
            ActionKind::Save | ActionKind::Create => {
                out.push_str(&format!(
                    r#"<button type="submit"{disabled}>{}</button>"#,
                    html_escape(&action.label)
                ));
            }
            ActionKind::Delete => {
                out.push_str(&format!(
                    r#"<button type="submit" formaction="{}" formnovalidate{disabled}>{}</button>"#,
                    html_escape(delete_url),
                    html_escape(&action.label)
                ));
            }
            ActionKind::Cancel => {
                let href = action.link.as_deref().unwrap_or("/");
                out.push_str(&format!(
                    r#"<a href="{}">{}</a>"#,
                    html_escape(href),
                    html_escape(&action.label)
                ));
            }
        }
    }
    out.push_str("</div></form>");
    out
}

fn field_html(field: &FormField) -> String {
    let name = html_escape(&field.name);
    let label = html_escape(&field.label);
    let disabled = if field.readonly { " disabled" } else { "" };
    let required = if field.required { " required" } else { "" };

    let control = match &field.kind {
        FieldKind::Textarea => format!(
            r#"<textarea name="{name}" rows="5"{required}{disabled}>{}</textarea>"#,
            html_escape(&value_text(&field.value))
        ),
        FieldKind::Int => format!(
            r#"<input type="number" name="{name}" value="{}"{required}{disabled}>"#,
            html_escape(&value_text(&field.value))
        ),
        FieldKind::Float => format!(
            r#"<input type="number" step="any" name="{name}" value="{}"{required}{disabled}>"#,
            html_escape(&value_text(&field.value))
        ),
        FieldKind::Bool => {
            let checked = if field.value.as_bool().unwrap_or(false) {
                " checked"
            } else {
                ""
            };
            // The hidden input makes an unchecked box submit `false`; the
            // checkbox overrides it when checked.
            format!(
                r#"<input type="hidden" name="{name}" value="false"><input type="checkbox" name="{name}" value="true"{checked}{disabled}>"#
            )
        }
        FieldKind::Select { options } => {
            let current = field.value.as_str().unwrap_or("");
            let mut items = String::new();
            for option in options {
                let selected = if option == current { " selected" } else { "" };
                items.push_str(&format!(
                    r#"<option value="{0}"{selected}>{0}</option>"#,
                    html_escape(option)
                ));
            }
            format!(r#"<select name="{name}"{required}{disabled}>{items}</select>"#)
        }
        FieldKind::Text | FieldKind::Datetime => format!(
            r#"<input type="text" name="{name}" value="{}"{required}{disabled}>"#,
            html_escape(&value_text(&field.value))
        ),
    };

    format!(r#"<label for="{name}">{label}</label>{control}"#)
}

/// Full detail page: crumbs, title, form.
pub fn detail_page(view: &FormView, post_url: &str, delete_url: &str) -> String {
    let content = format!(
        "{}<h1>{}</h1>{}",
        breadcrumbs(&view.crumbs),
        html_escape(&view.title),
        form_fragment(&view.form, post_url, delete_url),
    );
    layout(&view.title, &content)
}

/// Grid listing: one row per record with edit and view links.
pub fn grid_page(
    title: &str,
    grid_link: &str,
    records: &[Record],
    descriptor: &EntityDescriptor,
) -> String {
    let mut rows = String::new();
    for record in records {
        rows.push_str(&format!(
            r#"<tr><td>{id}</td><td>{title}</td><td><a href="{link}/item/{id}">Edit</a> <a href="{link}/item/{id}/view">View</a></td></tr>"#,
            id = record.id,
            title = html_escape(&record.title(descriptor)),
            link = html_escape(grid_link),
        ));
    }
    let content = format!(
        r#"<h1>{title}</h1>
<p><a href="{link}/item/new">Add {singular}</a></p>
<table>
<tr><th>ID</th><th>Title</th><th></th></tr>
{rows}
</table>"#,
        title = html_escape(title),
        link = html_escape(grid_link),
        singular = html_escape(descriptor.singular_name()),
        rows = rows,
    );
    layout(title, &content)
}

/// Home page: links to every configured grid.
pub fn home_page(grids: &[(String, String)]) -> String {
    let mut items = String::new();
    for (title, link) in grids {
        items.push_str(&format!(
            r#"<li><a href="{}">{}</a></li>"#,
            html_escape(link),
            html_escape(title)
        ));
    }
    layout("Grids", &format!("<h1>Grids</h1><ul>{}</ul>", items))
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Simple HTML escape function
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowforge_core::descriptor::FieldDescriptor;
    use rowforge_forms::FormAction;
    use serde_json::json;

    #[test]
    fn fragment_renders_fields_and_actions() {
        let descriptor = EntityDescriptor::new(
            "page",
            vec![FieldDescriptor::text("title").required()],
        );
        let mut form = Form::new("detail").with_descriptor_fields(&descriptor);
        form.push_action(FormAction::new(ActionKind::Save));
        form.push_action(FormAction::new(ActionKind::Delete));
        form.field_mut("title").unwrap().value = json!("A <b> title");

        let html = form_fragment(&form, "/grids/pages/item/1", "/grids/pages/item/1/delete");
        assert!(html.contains(r#"action="/grids/pages/item/1""#));
        assert!(html.contains("A &lt;b&gt; title"));
        assert!(html.contains(r#"formaction="/grids/pages/item/1/delete""#));
    }

    #[test]
    fn disabled_actions_render_disabled() {
        let mut form = Form::new("detail");
        form.push_action(FormAction::new(ActionKind::Save));
        form.make_readonly();
        let html = form_fragment(&form, "/x", "/x/delete");
        assert!(html.contains("disabled"));
    }

    #[test]
    fn breadcrumbs_link_all_but_unlinked() {
        let crumbs = [
            Crumb::linked("Home", "/"),
            Crumb::unlinked("New page"),
        ];
        let html = breadcrumbs(&crumbs);
        assert!(html.contains(r#"<a href="/">Home</a>"#));
        assert!(html.contains("New page"));
    }
}
