use crate::models::project::CodeBundle;

/// Compiled-in source strings of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateCode {
    pub html: &'static str,
    pub css: &'static str,
    pub js: &'static str,
}

impl TemplateCode {
    pub fn to_bundle(&self) -> CodeBundle {
        CodeBundle {
            html: self.html.to_string(),
            css: self.css.to_string(),
            js: self.js.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    /// Lowercase phrase the resolver matches prompts against.
    pub trigger: &'static str,
    pub code: TemplateCode,
}

macro_rules! bundled {
    ($slug:literal) => {
        TemplateCode {
            html: include_str!(concat!("assets/", $slug, "/index.html")),
            css: include_str!(concat!("assets/", $slug, "/styles.css")),
            js: include_str!(concat!("assets/", $slug, "/script.js")),
        }
    };
}

pub static TODO_LIST: Template = Template {
    name: "Todo List",
    trigger: "todo list app",
    code: bundled!("todo_list"),
};

pub static CALCULATOR: Template = Template {
    name: "Calculator",
    trigger: "calculator",
    code: bundled!("calculator"),
};

pub static BLOG_SUMMARIZER: Template = Template {
    name: "Blog Summarizer",
    trigger: "blog post summarizer",
    code: bundled!("blog_summarizer"),
};

pub static CONTACT_FORM: Template = Template {
    name: "Contact Form",
    trigger: "contact form",
    code: bundled!("contact_form"),
};

/// Returned when nothing in [`CATALOG`] matches.
pub static HELLO_WORLD: Template = Template {
    name: "Hello World",
    trigger: "default",
    code: bundled!("hello_world"),
};

/// Matchable templates in priority order. Order matters: the resolver takes
/// the first hit.
pub static CATALOG: [&Template; 4] = [&TODO_LIST, &CALCULATOR, &BLOG_SUMMARIZER, &CONTACT_FORM];

pub fn default_template() -> &'static Template {
    &HELLO_WORLD
}
