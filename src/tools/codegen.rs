//! Code generation tools: single components and page layouts.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{Arguments, Field, HandlerFuture, InputSchema, ToolDefinition};
use crate::artifacts::Artifacts;

/// Package every generated import points at.
pub const PACKAGE: &str = "@unmessme/design-system";

const LAYOUT_TYPES: [&str; 3] = ["dashboard", "form", "landing"];

const DASHBOARD_TEMPLATE: &str = r"import { Box, Card, Heading, Text, Button } from '@unmessme/design-system';

export function Dashboard() {
  return (
    <Box sx={{ padding: 4 }}>
      <Heading level={1}>Dashboard</Heading>

      <Box sx={{ display: 'grid', gridTemplateColumns: 'repeat(3, 1fr)', gap: 3, marginTop: 4 }}>
        <Card>
          <Heading level={3}>Metric 1</Heading>
          <Text>Value: 1,234</Text>
        </Card>

        <Card>
          <Heading level={3}>Metric 2</Heading>
          <Text>Value: 5,678</Text>
        </Card>

        <Card>
          <Heading level={3}>Metric 3</Heading>
          <Text>Value: 9,012</Text>
        </Card>
      </Box>
    </Box>
  );
}";

const FORM_TEMPLATE: &str = r#"import { Box, Heading, Input, Button, Stack } from '@unmessme/design-system';

export function FormPage() {
  return (
    <Box sx={{ maxWidth: '600px', margin: '0 auto', padding: 4 }}>
      <Heading level={1}>Form</Heading>

      <Stack spacing={3} sx={{ marginTop: 4 }}>
        <Input label="Name" placeholder="Enter your name" />
        <Input label="Email" type="email" placeholder="Enter your email" />
        <Input label="Message" multiline rows={4} placeholder="Enter your message" />

        <Button variant="primary" size="md">
          Submit
        </Button>
      </Stack>
    </Box>
  );
}"#;

const LANDING_TEMPLATE: &str = r#"import { Box, Heading, Text, Button, Stack } from '@unmessme/design-system';

export function LandingPage() {
  return (
    <Box>
      {/* Hero Section */}
      <Box sx={{ textAlign: 'center', padding: 8, backgroundColor: 'primary.main' }}>
        <Heading level={1} sx={{ color: 'white' }}>
          Welcome to UnmessMe
        </Heading>
        <Text sx={{ color: 'white', marginTop: 2, fontSize: 'lg' }}>
          The design system that makes sense
        </Text>
        <Button variant="secondary" size="lg" sx={{ marginTop: 4 }}>
          Get Started
        </Button>
      </Box>

      {/* Features Section */}
      <Box sx={{ padding: 8 }}>
        <Heading level={2} sx={{ textAlign: 'center' }}>Features</Heading>
        <Stack spacing={4} sx={{ marginTop: 4 }}>
          <Box>
            <Heading level={3}>Feature 1</Heading>
            <Text>Description of feature 1</Text>
          </Box>
          <Box>
            <Heading level={3}>Feature 2</Heading>
            <Text>Description of feature 2</Text>
          </Box>
          <Box>
            <Heading level={3}>Feature 3</Heading>
            <Text>Description of feature 3</Text>
          </Box>
        </Stack>
      </Box>
    </Box>
  );
}"#;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "generate_component_code",
            description: "Generate ready-to-use component code with specified props and children",
            schema: InputSchema::new(vec![
                Field::string("component", "Component name (e.g., 'Button', 'Card')"),
                Field::object("props", "Component props as key-value pairs").optional(),
                Field::string("children", "Component children/content").optional(),
            ]),
            handler: generate_component_code,
        },
        ToolDefinition {
            name: "generate_page_layout",
            description: "Generate a complete page layout using design system components \
                          (dashboard, form, or landing page)",
            schema: InputSchema::new(vec![
                Field::string("layout_type", "Type of page layout to generate").one_of(&LAYOUT_TYPES),
                Field::string("customize", "Optional customization instructions").optional(),
            ]),
            handler: generate_page_layout,
        },
    ]
}

#[derive(Deserialize)]
struct ComponentParams {
    component: String,
    #[serde(default)]
    props: Map<String, Value>,
    #[serde(default)]
    children: Option<String>,
}

#[derive(Deserialize)]
struct LayoutParams {
    layout_type: String,
    #[serde(default)]
    customize: Option<String>,
}

/// The import line for one component.
#[must_use]
pub fn import_line(component: &str) -> String {
    format!("import {{ {component} }} from '{PACKAGE}';")
}

/// Renders props as JSX attributes, in insertion order.
///
/// `false` props are omitted and `true` props become bare attributes.
#[must_use]
pub fn render_props(props: &Map<String, Value>) -> String {
    props
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some(format!("{key}=\"{s}\"")),
            Value::Bool(true) => Some(key.clone()),
            Value::Bool(false) => None,
            Value::Object(_) | Value::Array(_) | Value::Number(_) | Value::Null => {
                Some(format!("{key}={{{value}}}"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a JSX element, self-closing when there are no children.
#[must_use]
pub fn render_element(component: &str, props: &Map<String, Value>, children: Option<&str>) -> String {
    let props = render_props(props);
    let props = if props.is_empty() {
        String::new()
    } else {
        format!(" {props}")
    };

    match children.filter(|c| !c.is_empty()) {
        Some(children) => format!("<{component}{props}>\n  {children}\n</{component}>"),
        None => format!("<{component}{props} />"),
    }
}

fn generate_component_code(_artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let ComponentParams {
            component,
            props,
            children,
        } = args.parse()?;

        let import = import_line(&component);
        let code = render_element(&component, &props, children.as_deref());
        let full_example = format!("{import}\n\n{code}");

        Ok(json!({
            "component": component,
            "import": import,
            "code": code,
            "fullExample": full_example,
        }))
    })
}

fn layout_template(layout_type: &str) -> Option<&'static str> {
    match layout_type {
        "dashboard" => Some(DASHBOARD_TEMPLATE),
        "form" => Some(FORM_TEMPLATE),
        "landing" => Some(LANDING_TEMPLATE),
        _ => None,
    }
}

fn generate_page_layout(_artifacts: &Artifacts, args: Arguments) -> HandlerFuture<'_> {
    Box::pin(async move {
        let LayoutParams {
            layout_type,
            customize,
        } = args.parse()?;

        let Some(code) = layout_template(&layout_type) else {
            return Ok(json!({
                "error": format!("Layout type '{layout_type}' not found"),
                "available": LAYOUT_TYPES,
            }));
        };

        let mut reply = json!({
            "layout_type": layout_type,
            "code": code,
        });
        if let Some(customize) = customize.filter(|c| !c.is_empty()) {
            reply["customization_note"] = json!(format!(
                "Note: To apply customization \"{customize}\", modify the generated code accordingly."
            ));
        }
        Ok(reply)
    })
}
