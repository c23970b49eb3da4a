use crate::config::{Config, DocsUi};
use askama::Template;

#[derive(Template)]
#[template(
    ext = "html",
    source = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <link href="https://fonts.googleapis.com/css?family=Montserrat:300,400,700|Roboto:300,400,700" rel="stylesheet">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <redoc spec-url="{{ spec_url }}"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
</body>
</html>"##
)]
struct RedocPage<'a> {
    title: &'a str,
    spec_url: &'a str,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: "{{ spec_url }}", dom_id: "#swagger-ui" });
        };
    </script>
</body>
</html>"##
)]
struct SwaggerPage<'a> {
    title: &'a str,
    spec_url: &'a str,
}

/// The documentation page for the configured UI, or `None` when disabled.
///
/// Template values are HTML-escaped.
pub fn page(config: &Config) -> Option<String> {
    let spec_url = config.spec_url();
    let rendered = match config.ui {
        DocsUi::Redoc => RedocPage {
            title: &config.title,
            spec_url: &spec_url,
        }
        .render(),
        DocsUi::Swagger => SwaggerPage {
            title: &config.title,
            spec_url: &spec_url,
        }
        .render(),
        DocsUi::Disabled => return None,
    };

    match rendered {
        Ok(html) => Some(html),
        Err(err) => {
            tracing::error!(error = %err, "failed to render documentation page");
            None
        }
    }
}
