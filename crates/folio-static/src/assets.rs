//! Asset pipeline for the fragment stylesheet and copy-button script.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file, fragment styles followed by the highlight theme.
    pub fn generate_css() -> String {
        let mut css = DEFAULT_CSS.to_string();
        css.push_str("\n/* Syntax highlighting */\n");
        css.push_str(&folio_markup::highlight::theme_css());
        css
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Only what rendered fragments need; page layout is left to the host site.
const DEFAULT_CSS: &str = r#"/* Folio fragment styles */

:root {
  --code-bg: #1e1e1e;
  --code-header-bg: #1f2937;
  --code-fg: #d4d4d4;
  --code-muted: #6b7280;
  --content-max-width: 800px;
}

.main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem 1rem;
}

.content {
  line-height: 1.6;
}

.content li {
  list-style: none;
}

/* Code fragments */
.code-block {
  margin: 2rem 0;
  border-radius: 0.75rem;
  overflow: hidden;
  border: 1px solid #e5e7eb;
}

.code-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 0.5rem 1rem;
  background: var(--code-header-bg);
}

.code-language {
  color: #d1d5db;
  font-size: 0.875rem;
  font-weight: 500;
}

.copy-btn {
  padding: 0.125rem 0.5rem;
  font-size: 0.75rem;
  color: #9ca3af;
  background: none;
  border: none;
  cursor: pointer;
  transition: color 0.2s;
}

.copy-btn:hover {
  color: #e5e7eb;
}

.code-block pre {
  margin: 0;
  padding: 1rem;
  overflow-x: auto;
  background: var(--code-bg);
  color: var(--code-fg);
  font-family: ui-monospace, monospace;
  font-size: 0.875rem;
}

.code-line {
  display: flex;
}

.line-number {
  min-width: 2rem;
  margin-right: 1rem;
  text-align: right;
  color: var(--code-muted);
  user-select: none;
}

.line-content {
  flex: 1;
  white-space: pre;
}
"#;

const DEFAULT_JS: &str = r#"// Folio - copy buttons for code fragments
(function() {
  'use strict';

  const FEEDBACK_MS = 2000;

  document.querySelectorAll('.code-block').forEach(block => {
    const btn = block.querySelector('.copy-btn');
    if (!btn) return;

    let revert = null;

    btn.addEventListener('click', async () => {
      // Literal body only: line numbers live in separate spans.
      const text = Array.from(block.querySelectorAll('.line-content'))
        .map(line => line.textContent)
        .join('\n');

      try {
        await navigator.clipboard.writeText(text);
      } catch (err) {
        return;
      }

      btn.textContent = 'Copied!';
      clearTimeout(revert);
      revert = setTimeout(() => { btn.textContent = 'Copy'; }, FEEDBACK_MS);
    });
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(".code-block"));
        assert!(css.contains(".line-number"));
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn generates_js() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("clipboard"));
        assert!(js.contains("FEEDBACK_MS = 2000"));
        assert!(js.contains("'Copied!'"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.code-block {
    margin: 2rem 0;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".code-block"));
    }

    #[test]
    fn minifies_default_css() {
        let css = AssetPipeline::generate_css();
        let minified = AssetPipeline::minify_css(&css).unwrap();
        assert!(minified.len() < css.len());
    }
}
