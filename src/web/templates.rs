//! Template rendering with Tera

use anyhow::Result;
use tera::{Context, Tera};

/// Template renderer
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Components first, pages include them
        tera.add_raw_template(
            "components/header.html",
            include_str!("../templates/components/header.html"),
        )?;
        tera.add_raw_template(
            "components/search_form.html",
            include_str!("../templates/components/search_form.html"),
        )?;
        tera.add_raw_template(
            "components/history.html",
            include_str!("../templates/components/history.html"),
        )?;

        tera.add_raw_template("base.html", include_str!("../templates/base.html"))?;

        tera.add_raw_template("index.html", include_str!("../templates/index.html"))?;
        tera.add_raw_template("search.html", include_str!("../templates/search.html"))?;
        tera.add_raw_template("auth.html", include_str!("../templates/auth.html"))?;

        Ok(Self { tera })
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        assert!(Templates::new().is_ok());
    }
}
