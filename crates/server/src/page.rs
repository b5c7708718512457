//! HTML rendering for the single form page.

use registro_core::record::MAX_LENGTHS;
use registro_sheet::Sheet;
use serde::Deserialize;

pub const PAGE_TITLE: &str = "Formulario App";
pub const HEADING: &str = "Registro de interesados";
pub const INTRO: &str = "Completa el formulario para registrar un nuevo interesado. \
    Los datos se guardarán automáticamente en el archivo de Excel alojado en Google Drive.";

/// Rows of the resulting table shown after a successful submission.
pub const PREVIEW_ROWS: usize = 10;

/// Raw form fields as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub comentarios: String,
}

/// A message box on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Info(_) => "info",
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Info(t) | Notice::Warning(t) | Notice::Error(t) => t,
        }
    }
}

/// State of the "saved records" panel.
#[derive(Debug, Default)]
pub enum Panel {
    #[default]
    Closed,
    Open {
        notice: Option<Notice>,
        table: Option<Sheet>,
    },
}

/// Everything one render of the page shows.
#[derive(Debug, Default)]
pub struct Page {
    pub form: ContactForm,
    pub notices: Vec<Notice>,
    pub preview: Option<Sheet>,
    pub panel: Panel,
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>📝 {title}</title>
<style>
body {{ font-family: sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }}
label {{ display: block; margin-top: .8rem; }}
input, textarea {{ width: 100%; box-sizing: border-box; padding: .4rem; }}
.notice {{ padding: .6rem .8rem; margin: .8rem 0; border-radius: .3rem; }}
.success {{ background: #e6f4ea; }} .info {{ background: #e8f0fe; }}
.warning {{ background: #fef7e0; }} .error {{ background: #fce8e6; }}
table {{ border-collapse: collapse; width: 100%; margin-top: .8rem; }}
th, td {{ border: 1px solid #ddd; padding: .3rem .5rem; text-align: left; }}
details {{ margin-top: 2rem; }}
</style>
</head>
<body>
<h1>{heading}</h1>
{body}
</body>
</html>
"#,
        title = PAGE_TITLE,
        heading = HEADING,
        body = body
    )
}

fn render_notice(notice: &Notice) -> String {
    format!(
        "<div class=\"notice {}\" role=\"alert\">{}</div>\n",
        notice.class(),
        escape(notice.text())
    )
}

fn render_table(sheet: &Sheet) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    if let Some(names) = sheet.column_names() {
        for name in names {
            html.push_str(&format!("<th>{}</th>", escape(name)));
        }
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in sheet.records() {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(&cell.as_str())));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_form(form: &ContactForm) -> String {
    let [name_max, email_max, phone_max, comments_max] = MAX_LENGTHS;
    format!(
        r#"<form method="post" action="/">
<label for="nombre">Nombre completo</label>
<input id="nombre" name="nombre" type="text" maxlength="{name_max}" value="{nombre}">
<label for="correo">Correo electrónico</label>
<input id="correo" name="correo" type="email" maxlength="{email_max}" value="{correo}">
<label for="telefono">Teléfono de contacto</label>
<input id="telefono" name="telefono" type="tel" maxlength="{phone_max}" value="{telefono}">
<label for="comentarios">Comentarios o necesidades</label>
<textarea id="comentarios" name="comentarios" rows="4" maxlength="{comments_max}">{comentarios}</textarea>
<p><button type="submit">Enviar</button></p>
</form>
"#,
        nombre = escape(&form.nombre),
        correo = escape(&form.correo),
        telefono = escape(&form.telefono),
        comentarios = escape(&form.comentarios),
    )
}

fn render_panel(panel: &Panel) -> String {
    let (open, content) = match panel {
        Panel::Closed => ("", String::new()),
        Panel::Open { notice, table } => {
            let mut content = String::new();
            if let Some(notice) = notice {
                content.push_str(&render_notice(notice));
            }
            if let Some(table) = table {
                content.push_str(&render_table(table));
            }
            (" open", content)
        }
    };

    format!(
        r#"<details{open}>
<summary>Ver registros guardados</summary>
<form method="get" action="/registros"><button type="submit">Actualizar registros</button></form>
{content}</details>
"#
    )
}

impl Page {
    /// Render the full page.
    pub fn render(&self) -> String {
        let mut body = format!("<p>{}</p>\n", escape(INTRO));
        body.push_str(&render_form(&self.form));
        for notice in &self.notices {
            body.push_str(&render_notice(notice));
        }
        if let Some(preview) = &self.preview {
            body.push_str(&render_table(preview));
        }
        body.push_str(&render_panel(&self.panel));
        layout(&body)
    }
}

/// Page shown when storage could not be configured: only the error.
pub fn render_unavailable(message: &str) -> String {
    layout(&render_notice(&Notice::Error(message.to_string())))
}
