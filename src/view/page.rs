//! HTML pages. Every interpolated user string goes through `escape_html`
//! (content and attributes) or `urlencoding::encode` (query strings).

use crate::app::car_service::ListView;
use crate::domain::Car;
use crate::view::escape::escape_html;
use std::fmt::{self, Write};

const STYLESHEET: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0-alpha1/dist/css/bootstrap.min.css";

/// Renders the list, the create/edit form and the pagination controls.
pub fn render_index(view: &ListView) -> String {
    let mut html = String::with_capacity(8 * 1024);
    // Writing into a String cannot fail.
    let _ = write_index(&mut html, view);
    html
}

/// Renders a standalone page for a rejected or failed request.
pub fn render_error(title: &str, message: &str) -> String {
    let mut html = String::with_capacity(1024);
    let _ = write_error(&mut html, title, message);
    html
}

fn write_head(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "    <meta charset=\"UTF-8\">")?;
    writeln!(
        out,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(out, "    <title>{}</title>", escape_html(title))?;
    writeln!(out, "    <link href=\"{}\" rel=\"stylesheet\">", STYLESHEET)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<div class=\"container mt-5\">")
}

fn write_tail(out: &mut String) -> fmt::Result {
    writeln!(out, "</div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_index(out: &mut String, view: &ListView) -> fmt::Result {
    write_head(out, "Car Management System")?;
    writeln!(out, "    <h2>Car Management System</h2>")?;
    writeln!(
        out,
        "    <p>Currently managing cars in the table: <strong>{}</strong> ({} total)</p>",
        escape_html(&view.table_name),
        view.table_total
    )?;

    write_search_form(out, &view.search)?;
    write_car_form(out, view.editing.as_ref())?;
    write_car_table(out, &view.cars)?;
    write_pagination(out, view)?;

    write_tail(out)
}

fn write_search_form(out: &mut String, search: &str) -> fmt::Result {
    writeln!(out, "    <form method=\"GET\" action=\"/\" class=\"mb-4\">")?;
    writeln!(
        out,
        "        <input type=\"text\" name=\"search\" placeholder=\"Search by brand/model\" class=\"form-control mb-2\" value=\"{}\">",
        escape_html(search)
    )?;
    writeln!(
        out,
        "        <button type=\"submit\" class=\"btn btn-secondary\">Search</button>"
    )?;
    writeln!(out, "    </form>")
}

fn write_car_form(out: &mut String, editing: Option<&Car>) -> fmt::Result {
    let id = editing.map(|c| c.id.to_string()).unwrap_or_default();
    let brand = editing.map(|c| escape_html(&c.brand)).unwrap_or_default();
    let model = editing.map(|c| escape_html(&c.model)).unwrap_or_default();
    let year = editing.map(|c| c.year.to_string()).unwrap_or_default();
    let price = editing
        .map(|c| format!("{:.2}", c.price))
        .unwrap_or_default();

    writeln!(
        out,
        "    <form method=\"POST\" action=\"/\" class=\"mb-4\" id=\"carForm\">"
    )?;
    writeln!(out, "        <input type=\"hidden\" name=\"id\" value=\"{}\">", id)?;
    write_input(out, "brand", "Brand", "text", "", &brand)?;
    write_input(out, "model", "Model", "text", "", &model)?;
    write_input(out, "year", "Year", "number", " min=\"1000\" max=\"9999\"", &year)?;
    write_input(out, "price", "Price", "number", " min=\"0\" step=\"0.01\"", &price)?;

    let label = if editing.is_some() { "Update" } else { "Add" };
    writeln!(
        out,
        "        <button type=\"submit\" class=\"btn btn-primary\">{}</button>",
        label
    )?;
    if editing.is_some() {
        writeln!(
            out,
            "        <a href=\"/\" class=\"btn btn-link\">Cancel</a>"
        )?;
    }
    writeln!(out, "    </form>")
}

/// `value` must already be escaped.
fn write_input(
    out: &mut String,
    name: &str,
    label: &str,
    kind: &str,
    extra: &str,
    value: &str,
) -> fmt::Result {
    writeln!(out, "        <div class=\"mb-3\">")?;
    writeln!(
        out,
        "            <label for=\"{name}\" class=\"form-label\">{label}</label>"
    )?;
    writeln!(
        out,
        "            <input type=\"{kind}\" class=\"form-control\" id=\"{name}\" name=\"{name}\" required{extra} value=\"{value}\">"
    )?;
    writeln!(out, "        </div>")
}

fn write_car_table(out: &mut String, cars: &[Car]) -> fmt::Result {
    writeln!(out, "    <table class=\"table\">")?;
    writeln!(out, "        <thead>")?;
    writeln!(out, "            <tr>")?;
    for heading in ["ID", "Brand", "Model", "Year", "Price", "Actions"] {
        writeln!(out, "                <th scope=\"col\">{}</th>", heading)?;
    }
    writeln!(out, "            </tr>")?;
    writeln!(out, "        </thead>")?;
    writeln!(out, "        <tbody>")?;
    for car in cars {
        writeln!(out, "            <tr>")?;
        writeln!(out, "                <td>{}</td>", car.id)?;
        writeln!(out, "                <td>{}</td>", escape_html(&car.brand))?;
        writeln!(out, "                <td>{}</td>", escape_html(&car.model))?;
        writeln!(out, "                <td>{}</td>", car.year)?;
        writeln!(out, "                <td>{:.2}</td>", car.price)?;
        writeln!(out, "                <td>")?;
        writeln!(
            out,
            "                    <a href=\"/?edit={}\" class=\"btn btn-warning btn-sm\">Edit</a>",
            car.id
        )?;
        writeln!(
            out,
            "                    <a href=\"/?delete={}\" class=\"btn btn-danger btn-sm\" onclick=\"return confirm('Delete this car?');\">Delete</a>",
            car.id
        )?;
        writeln!(out, "                </td>")?;
        writeln!(out, "            </tr>")?;
    }
    writeln!(out, "        </tbody>")?;
    writeln!(out, "    </table>")
}

fn write_pagination(out: &mut String, view: &ListView) -> fmt::Result {
    let window = view.window;
    let search = urlencoding::encode(&view.search);
    let prev = window.page.saturating_sub(1).max(1);
    let next = window.page.saturating_add(1).min(window.total_pages);

    writeln!(out, "    <nav aria-label=\"Page navigation\">")?;
    writeln!(out, "        <ul class=\"pagination\">")?;
    write_page_link(out, "First", 1, &search, !window.has_prev())?;
    write_page_link(out, "Previous", prev, &search, !window.has_prev())?;
    writeln!(
        out,
        "            <li class=\"page-item active\"><span class=\"page-link\">Page {} of {}</span></li>",
        window.page, window.total_pages
    )?;
    write_page_link(out, "Next", next, &search, !window.has_next())?;
    write_page_link(out, "Last", window.total_pages, &search, !window.has_next())?;
    writeln!(out, "        </ul>")?;
    writeln!(out, "    </nav>")
}

/// `search` must already be URL-encoded.
fn write_page_link(
    out: &mut String,
    label: &str,
    page: u32,
    search: &str,
    disabled: bool,
) -> fmt::Result {
    let (class, extra) = if disabled {
        (" disabled", " tabindex=\"-1\" aria-disabled=\"true\"")
    } else {
        ("", "")
    };
    writeln!(
        out,
        "            <li class=\"page-item{class}\"><a class=\"page-link\" href=\"/?page={page}&amp;search={search}\"{extra}>{label}</a></li>"
    )
}

fn write_error(out: &mut String, title: &str, message: &str) -> fmt::Result {
    write_head(out, title)?;
    writeln!(out, "    <h2>{}</h2>", escape_html(title))?;
    writeln!(
        out,
        "    <div class=\"alert alert-danger\" role=\"alert\">{}</div>",
        escape_html(message)
    )?;
    writeln!(out, "    <a href=\"/\" class=\"btn btn-secondary\">Back to the list</a>")?;
    write_tail(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PageRequest, PageWindow};
    use rust_decimal::Decimal;

    fn car(id: i32, brand: &str, model: &str) -> Car {
        Car {
            id,
            brand: brand.to_string(),
            model: model.to_string(),
            year: 2020,
            price: Decimal::new(1_800_000, 2),
        }
    }

    fn view(page: u32, total_rows: u64, search: &str) -> ListView {
        ListView {
            cars: vec![car(1, "Toyota", "Corolla")],
            editing: None,
            window: PageWindow::new(PageRequest::new(page), total_rows),
            search: search.to_string(),
            table_total: total_rows,
            table_name: "cars".to_string(),
        }
    }

    #[test]
    fn renders_rows_with_actions() {
        let html = render_index(&view(1, 1, ""));
        assert!(html.contains("<td>Toyota</td>"));
        assert!(html.contains("<td>18000.00</td>"));
        assert!(html.contains("href=\"/?edit=1\""));
        assert!(html.contains("href=\"/?delete=1\""));
        assert!(html.contains("<strong>cars</strong>"));
    }

    #[test]
    fn escapes_user_text_everywhere() {
        let mut v = view(1, 1, "\"><script>");
        v.cars = vec![car(1, "<b>Evil</b>", "M&M")];
        v.editing = Some(car(1, "<b>Evil</b>", "\" onfocus=\"x"));
        let html = render_index(&v);

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>Evil</b>"));
        assert!(html.contains("&lt;b&gt;Evil&lt;/b&gt;"));
        assert!(html.contains("M&amp;M"));
        assert!(html.contains("value=\"&quot; onfocus=&quot;x\""));
        assert!(html.contains("search=%22%3E%3Cscript%3E"));
    }

    #[test]
    fn edit_mode_prefills_form() {
        let mut v = view(1, 1, "");
        v.editing = Some(car(7, "Toyota", "Camry"));
        let html = render_index(&v);
        assert!(html.contains("name=\"id\" value=\"7\""));
        assert!(html.contains("value=\"Camry\""));
        assert!(html.contains("value=\"18000.00\""));
        assert!(html.contains(">Update</button>"));
    }

    #[test]
    fn create_mode_has_empty_form() {
        let html = render_index(&view(1, 1, ""));
        assert!(html.contains("name=\"id\" value=\"\""));
        assert!(html.contains(">Add</button>"));
    }

    #[test]
    fn pagination_disables_at_boundaries() {
        let html = render_index(&view(1, 25, "toy"));
        assert!(html.contains(
            "<li class=\"page-item disabled\"><a class=\"page-link\" href=\"/?page=1&amp;search=toy\""
        ));
        assert!(html.contains("<li class=\"page-item\"><a class=\"page-link\" href=\"/?page=2&amp;search=toy\">Next</a>"));
        assert!(html.contains("<li class=\"page-item\"><a class=\"page-link\" href=\"/?page=3&amp;search=toy\">Last</a>"));

        let html = render_index(&view(3, 25, ""));
        assert!(html.contains("<li class=\"page-item\"><a class=\"page-link\" href=\"/?page=2&amp;search=\">Previous</a>"));
        assert!(html.contains("href=\"/?page=3&amp;search=\" tabindex=\"-1\" aria-disabled=\"true\">Next</a>"));
        assert!(html.contains("Page 3 of 3"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error("Invalid input", "brand <b> is required");
        assert!(html.contains("brand &lt;b&gt; is required"));
        assert!(html.contains("href=\"/\""));
    }
}
