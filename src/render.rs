//! Document rendering seam.
//!
//! The real letter engine (branded DOCX/PDF output) is an external
//! collaborator; the pipeline only needs "one payload in, two blobs out"
//! with a descriptive error on failure. `TemplateRenderer` is the built-in
//! reference implementation: Tera templates producing plain letter bodies,
//! enough to run the pipeline end-to-end without the proprietary engine.

use crate::error::RenderError;
use crate::model::ResolvedPayload;
use tera::{Context, Tera};

/// The two blobs produced for one successful row.
#[derive(Debug, Clone)]
pub struct RenderedDocuments {
    pub editable: Vec<u8>,
    pub fixed: Vec<u8>,
}

pub trait DocumentRenderer {
    /// File extensions for the editable and fixed-layout outputs, in that
    /// order, without the leading dot.
    fn extensions(&self) -> (&str, &str);

    fn render(&self, payload: &ResolvedPayload) -> Result<RenderedDocuments, RenderError>;
}

const LETTER_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{{ document_type }} - {{ company_name }}</title></head>
<body>
<p>{{ company_name }}{% if company_address %}<br>{{ company_address }}{% endif %}</p>
{% if document_type == "LOA" %}
<p>This Letter of Agreement confirms the sponsorship of <strong>{{ company_name }}</strong>
for <strong>{{ meeting_name }}</strong>, to be held {{ meeting_date_long }} at
{{ venue }}, {{ city_state }}.</p>
{% else %}
<p>This Letter of Recognition acknowledges <strong>{{ company_name }}</strong> as a
sponsor of <strong>{{ meeting_name }}</strong>, {{ meeting_date_long }},
{{ venue }}, {{ city_state }}.</p>
{% endif %}
<p>Sponsorship total: {{ amount_currency }}</p>
{% if attendance_expected %}<p>Expected attendance: {{ attendance_expected }}</p>{% endif %}
<p>Audience: {{ audience_list | join(sep=", ") }}</p>
{% if signature_person %}<p>Sincerely,<br>{{ signature_person }}</p>{% endif %}
</body>
</html>
"#;

const LETTER_TEXT: &str = r#"{{ document_type }}{% if event_year %} {{ event_year }}{% endif %}

{{ company_name }}{% if company_address %}
{{ company_address }}{% endif %}

{% if document_type == "LOA" %}This Letter of Agreement confirms the sponsorship of {{ company_name }} for {{ meeting_name }}, to be held {{ meeting_date_long }} at {{ venue }}, {{ city_state }}.{% else %}This Letter of Recognition acknowledges {{ company_name }} as a sponsor of {{ meeting_name }}, {{ meeting_date_long }}, {{ venue }}, {{ city_state }}.{% endif %}

Sponsorship total: {{ amount_currency }}
{% if attendance_expected %}Expected attendance: {{ attendance_expected }}
{% endif %}Audience: {{ audience_list | join(sep=", ") }}
{% if signature_person %}
Sincerely,
{{ signature_person }}
{% endif %}"#;

/// Tera-backed reference renderer.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("letter.html", LETTER_HTML),
            ("letter.txt", LETTER_TEXT),
        ])?;
        Ok(Self { tera })
    }
}

impl DocumentRenderer for TemplateRenderer {
    fn extensions(&self) -> (&str, &str) {
        ("html", "txt")
    }

    fn render(&self, payload: &ResolvedPayload) -> Result<RenderedDocuments, RenderError> {
        let context = Context::from_serialize(payload)?;
        let editable = self.tera.render("letter.html", &context)?;
        let fixed = self.tera.render("letter.txt", &context)?;
        Ok(RenderedDocuments {
            editable: editable.into_bytes(),
            fixed: fixed.into_bytes(),
        })
    }
}
