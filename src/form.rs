//! The page surface the handler works against: three parameter controls,
//! the chart image and the download-link container.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlImageElement, HtmlInputElement,
    HtmlSelectElement,
};

use crate::protocol::{ScrapeRequest, ScrapeResponse};
use crate::{ScrapeError, ScrapeErrorKind};

const FORM_ID: &str = "scraperForm";
const TOP_ID: &str = "top";
const PLOT_ID: &str = "plot";
const EXPORT_ID: &str = "export";
const CHART_ID: &str = "chart";
const DOWNLOAD_ID: &str = "download-link";

/// Elements are looked up on every access, so a submission fails at the
/// moment it first touches a missing element, never earlier.
#[derive(Clone)]
pub struct ScraperForm {
    document: Document,
}

impl ScraperForm {
    /// The form itself must exist up front; everything else is resolved per
    /// submission.
    pub fn locate(document: Document) -> Result<ScraperForm, ScrapeError> {
        let surface = ScraperForm { document };
        surface.form()?;
        Ok(surface)
    }

    pub fn form(&self) -> Result<HtmlFormElement, ScrapeError> {
        self.element::<HtmlFormElement>(FORM_ID)
    }

    /// Read the three controls as they are right now.
    pub fn read_request(&self) -> Result<ScrapeRequest, ScrapeError> {
        Ok(ScrapeRequest {
            top: self.control_value(TOP_ID)?,
            plot: self.control_value(PLOT_ID)?,
            export: self.control_value(EXPORT_ID)?,
        })
    }

    /// Apply a response to the chart image and the download-link container.
    ///
    /// The two regions update independently. An absent chart URL hides the
    /// image but leaves its source as-is; an absent download URL clears the
    /// container.
    pub fn render(&self, response: &ScrapeResponse, export_format: &str) -> Result<(), JsValue> {
        let chart = self.element::<HtmlImageElement>(CHART_ID)?;
        match response.chart_url.as_deref() {
            Some(url) => {
                chart.set_src(url);
                chart.style().set_property("display", "block")?;
            }
            None => chart.style().set_property("display", "none")?,
        }

        let container = self.element::<HtmlElement>(DOWNLOAD_ID)?;
        match response.download_url.as_deref() {
            Some(url) => container.set_inner_html(&download_link_html(url, export_format)),
            None => container.set_inner_html(""),
        }

        Ok(())
    }

    /// `value` of a named control, whether it is an `<input>` or a `<select>`.
    fn control_value(&self, id: &str) -> Result<String, ScrapeError> {
        let element = self.element::<Element>(id)?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Ok(input.value());
        }
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            return Ok(select.value());
        }

        Err(ScrapeError::new(
            ScrapeErrorKind::MissingElement,
            format!("Element #{id} is not a form control"),
        ))
    }

    fn element<E: JsCast>(&self, id: &str) -> Result<E, ScrapeError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| {
                ScrapeError::new(
                    ScrapeErrorKind::MissingElement,
                    format!("No element with id #{id}"),
                )
            })?
            .dyn_into::<E>()
            .map_err(|_| {
                ScrapeError::new(
                    ScrapeErrorKind::MissingElement,
                    format!("Element #{id} has an unexpected type"),
                )
            })
    }
}

/// Markup for the download anchor: label `Download <FORMAT>` with the
/// submission-time export format uppercased.
pub fn download_link_html(url: &str, export_format: &str) -> String {
    format!(
        r#"<a href="{}" download>Download {}</a>"#,
        escape_html(url),
        escape_html(&export_format.to_uppercase()),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_label_uppercases_the_export_format() {
        let html = download_link_html("/download/imdb_top_movies.csv", "csv");
        assert_eq!(
            html,
            r#"<a href="/download/imdb_top_movies.csv" download>Download CSV</a>"#
        );
    }

    #[test]
    fn export_format_goes_through_verbatim_before_casing() {
        // No enumeration check: whatever the control held is what gets shown.
        let html = download_link_html("f.bin", "parquet");
        assert!(html.contains(">Download PARQUET<"));
    }

    #[test]
    fn url_is_attribute_escaped() {
        let html = download_link_html(r#"/download/a"b.csv"#, "json");
        assert_eq!(
            html,
            r#"<a href="/download/a&quot;b.csv" download>Download JSON</a>"#
        );
    }

    #[test]
    fn markup_in_values_cannot_break_out() {
        let html = download_link_html("<script>x</script>", "<b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Download &lt;B&gt;"));
    }
}
