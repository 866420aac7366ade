//! WiX source document rendering.

use crate::constants::{WIX_LANGUAGE, WIX_NAMESPACE};
use crate::package::PackageMetadata;
use crate::tree::{NodeId, NodeKind, Tree, format_id};
use uuid::Uuid;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A minimal XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

/// A rendered WiX source document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Package name, used to name the generated files.
    pub package_name: String,

    /// The `Wix` root element.
    pub root: XmlElement,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl XmlElement {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute unless `value` is empty.
    pub fn set(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Set an attribute when `value` is present and non-empty.
    pub fn set_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Append a child and return it.
    pub fn push(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{}<{}", indent, self.name));
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", key, escape(value)));
        }

        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        out.push_str(">\n");
        for child in &self.children {
            child.write_to(out, depth + 1);
        }
        out.push_str(&format!("{}</{}>\n", indent, self.name));
    }
}

impl Document {
    /// Serialize with an XML declaration and two-space indentation.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.root.write_to(&mut out, 0);
        out
    }

    /// The `Module` element.
    pub fn module(&self) -> Option<&XmlElement> {
        self.root.child("Module")
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Render `tree` and `metadata` into a WiX merge module source document.
pub fn render(tree: &Tree, metadata: &PackageMetadata) -> Document {
    let mut root = XmlElement::new("Wix");
    root.set("xmlns", WIX_NAMESPACE);

    let module = root.push(XmlElement::new("Module"));
    module.set("Id", &format_id(&metadata.name));
    module.set("Version", &metadata.version);
    module.set("Language", WIX_LANGUAGE);

    let package_id = match metadata.uuid.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format_guid(Uuid::new_v4()),
    };

    let package = module.push(XmlElement::new("Package"));
    package.set("Id", &package_id);
    package.set_opt("Description", metadata.shortdesc.as_deref());
    package.set_opt("Comments", metadata.longdesc.as_deref());
    package.set_opt("Manufacturer", metadata.vendor.as_deref());

    module.push(tree_element(tree, tree.root()));

    Document {
        package_name: metadata.name.clone(),
        root,
    }
}

fn tree_element(tree: &Tree, id: NodeId) -> XmlElement {
    let node = tree.node(id);
    match &node.kind {
        NodeKind::Root | NodeKind::Directory => {
            let mut dir = XmlElement::new("Directory")
                .with("Id", &node.id)
                .with("Name", &node.name);
            for &child in tree.children(id) {
                dir.push(tree_element(tree, child));
            }
            dir
        }
        NodeKind::Component {
            guid,
            file_id,
            source,
        } => {
            let mut component = XmlElement::new("Component")
                .with("Id", &node.id)
                .with("Guid", &format_guid(*guid));
            component.push(
                XmlElement::new("File")
                    .with("Id", file_id)
                    .with("Name", &node.name)
                    .with("Source", source),
            );
            component
        }
    }
}

fn format_guid(guid: Uuid) -> String {
    guid.hyphenated().to_string().to_uppercase()
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
