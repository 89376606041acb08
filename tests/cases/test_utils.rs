use std::collections::HashMap;

use helmish::{format, render_file, RenderOptions, ValueContext};
use regex::Regex;

/// A template, the values to render it with and what should come out.
///
/// Read from markdown files made of named code blocks:
///
/// ~~~text
/// template:
///
/// ```yaml
/// name: {{ .Values.name }}
/// ```
///
/// values:
///
/// ```yaml
/// name: web
/// ```
///
/// output:
///
/// ```yaml
/// name: web
/// ```
/// ~~~
///
/// `chart:` (metadata) and `values:` are optional. Instead of `output:` a case may give
/// `error:`, text that the first failing document's error message must contain.
pub struct TestCase {
    pub template: String,
    pub values: String,
    pub chart: String,
    pub expected: Expected,
    pub options: RenderOptions,
}

pub enum Expected {
    Output(String),
    Error(String),
}

impl TestCase {
    pub fn run(self) -> anyhow::Result<()> {
        let ctx = ValueContext::from_yaml(&self.values, &self.chart)?;
        let documents = render_file(&self.template, &ctx, &self.options);

        let mut rendered = Vec::new();
        let mut errors = Vec::new();
        for document in documents {
            match document.result {
                Ok(tokens) => rendered.push(tokens),
                Err(e) => errors.push(e.to_string()),
            }
        }

        match self.expected {
            Expected::Output(expected) => {
                if let Some(error) = errors.first() {
                    anyhow::bail!("expected output, got error: {error}");
                }
                assert_eq!(expected, format::raw(&rendered));
            }
            Expected::Error(expected) => {
                let Some(error) = errors.first() else {
                    anyhow::bail!("expected an error containing `{expected}`, got output");
                };
                assert!(
                    error.contains(expected.trim()),
                    "expected an error containing `{}`, got `{error}`",
                    expected.trim()
                );
            }
        }
        Ok(())
    }
}

pub fn parse_test_case(input: &str) -> anyhow::Result<TestCase> {
    // note: a code block's content keeps its trailing \n
    let re = Regex::new(r"(?ms)^([a-z]+):\s*\n```[a-z]*\n(.*?)^```$")?;

    let mut blocks: HashMap<String, String> = re
        .captures_iter(input)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();

    let template = blocks
        .remove("template")
        .ok_or_else(|| anyhow::anyhow!("missing template block"))?;

    let expected = match (blocks.remove("output"), blocks.remove("error")) {
        (Some(output), None) => Expected::Output(output),
        (None, Some(error)) => Expected::Error(error),
        _ => anyhow::bail!("expected exactly one of an output or error block"),
    };

    let options = RenderOptions {
        lenient: blocks
            .remove("options")
            .is_some_and(|options| options.trim() == "lenient"),
    };

    Ok(TestCase {
        template,
        values: blocks.remove("values").unwrap_or_default(),
        chart: blocks.remove("chart").unwrap_or_default(),
        expected,
        options,
    })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn test_case_works() -> anyhow::Result<()> {
        let input = indoc! {"
            template:

            ```yaml
            name: {{ .Values.name }}
            ```

            values:

            ```
            name: web
            ```

            output:

            ```
            name: web
            ```
        "};

        let test_case = parse_test_case(input)?;
        assert_eq!(test_case.template, "name: {{ .Values.name }}\n");
        assert_eq!(test_case.values, "name: web\n");
        assert_eq!(test_case.chart, "");
        assert!(matches!(test_case.expected, Expected::Output(ref o) if o == "name: web\n"));

        test_case.run()
    }
}
