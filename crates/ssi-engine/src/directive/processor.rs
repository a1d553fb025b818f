//! Document processor for SSI directives.
//!
//! Walks a document with an explicit work stack of frames. `get` and `call`
//! directives are resolved in place; `include` directives suspend the current
//! frame and push the included file on top of it.

use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::resolve::{render_call, render_get};
use crate::{DataItem, DataList, ExtensionTable, ScriptHost};

use super::parser::{DirectiveKind, find_directives};
use super::{DirectiveArgs, ResolveContext};

/// Default limit on nested inclusions.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 1024;

/// Type alias for the file reading callback function.
pub type ReadFileFn = dyn Fn(&Path) -> io::Result<String> + Send + Sync;

/// Configuration for the document processor.
pub struct ProcessorConfig {
    /// Identity of the top-level document, if it was loaded from a file.
    ///
    /// Used to recognise a document that includes itself.
    pub source_path: Option<PathBuf>,
    /// Callback to read included files.
    ///
    /// Default: `std::fs::read_to_string`
    pub read_file: Option<Box<ReadFileFn>>,
    /// Maximum number of nested inclusions. `None` disables the limit.
    ///
    /// Default: [`DEFAULT_MAX_INCLUDE_DEPTH`]
    pub max_include_depth: Option<usize>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source_path: None,
            read_file: None,
            max_include_depth: Some(DEFAULT_MAX_INCLUDE_DEPTH),
        }
    }

    /// Set the source file path.
    #[must_use]
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }

    /// Set the file reading callback.
    #[must_use]
    pub fn with_read_file<F>(mut self, read_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<String> + Send + Sync + 'static,
    {
        self.read_file = Some(Box::new(read_file));
        self
    }

    /// Set the maximum include depth.
    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = Some(depth);
        self
    }

    /// Remove the include depth limit.
    #[must_use]
    pub fn without_include_limit(mut self) -> Self {
        self.max_include_depth = None;
        self
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        match &self.read_file {
            Some(read_file) => read_file(path),
            None => std::fs::read_to_string(path),
        }
    }
}

impl std::fmt::Debug for ProcessorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorConfig")
            .field("source_path", &self.source_path)
            .field("read_file", &self.read_file.as_ref().map(|_| ".."))
            .field("max_include_depth", &self.max_include_depth)
            .finish()
    }
}

/// Suspended traversal state.
struct Frame {
    content: Rc<str>,
    /// Byte offset where scanning resumes.
    offset: usize,
    data_index: usize,
    file: Option<Rc<Path>>,
    data: Option<DataList>,
    depth: usize,
}

impl Frame {
    fn text(&self) -> &str {
        &self.content[self.offset..]
    }

    /// The rest of this frame after `consumed` bytes, resuming at `data_index`.
    fn continuation(&self, consumed: usize, data_index: usize) -> Self {
        Self {
            content: Rc::clone(&self.content),
            offset: self.offset + consumed,
            data_index,
            file: self.file.clone(),
            data: self.data.clone(),
            depth: self.depth,
        }
    }
}

/// Processor for SSI directives.
///
/// Per-render state lives on the stack of [`process`](Self::process), so a
/// processor can render many documents, including concurrently.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use ssi_engine::{Attribute, ScriptError, ScriptHost};
/// use ssi_engine::directive::Processor;
///
/// struct Site;
///
/// impl ScriptHost for Site {
///     type Env = ();
///     fn localize_path(&self, _: &(), path: &str) -> PathBuf { PathBuf::from(path) }
///     fn translate(&self, _: &(), text: &str) -> String { text.to_owned() }
///     fn property(&self, name: &str) -> Option<Attribute> {
///         (name == "Name").then(|| Attribute::new("X"))
///     }
/// }
///
/// let processor = Processor::new(&Site, &());
/// assert_eq!(processor.process("A<!-- #get var=Name -->B"), "AXB");
/// ```
pub struct Processor<'a, H: ScriptHost> {
    host: &'a H,
    env: &'a H::Env,
    extensions: Option<&'a ExtensionTable<H::Env>>,
    data: Option<DataList>,
    config: ProcessorConfig,
}

impl<'a, H: ScriptHost> Processor<'a, H> {
    /// Create a processor with default configuration and no data.
    #[must_use]
    pub fn new(host: &'a H, env: &'a H::Env) -> Self {
        Self {
            host,
            env,
            extensions: None,
            data: None,
            config: ProcessorConfig::default(),
        }
    }

    /// Set the processor configuration.
    #[must_use]
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the extension table consulted by `call` directives.
    #[must_use]
    pub fn with_extensions(mut self, extensions: &'a ExtensionTable<H::Env>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Set the data list templates iterate over.
    #[must_use]
    pub fn with_data(mut self, data: DataList) -> Self {
        self.data = Some(data);
        self
    }

    /// Render a document.
    ///
    /// Never fails: malformed directives, unreadable includes and unresolved
    /// names render as empty text.
    #[must_use]
    pub fn process(&self, document: &str) -> String {
        let file = self.config.source_path.as_deref().map(Rc::from);
        self.run(Frame {
            content: Rc::from(document),
            offset: 0,
            data_index: 0,
            file,
            data: self.data.clone(),
            depth: 0,
        })
    }

    /// Read and render a template file.
    ///
    /// The file's path becomes the identity of the top-level document, so a
    /// template that includes itself iterates from the first data element.
    ///
    /// # Errors
    ///
    /// Returns an error if the top-level file cannot be read.
    pub fn process_file(&self, path: impl AsRef<Path>) -> io::Result<String> {
        let path = path.as_ref();
        let content = self.config.read(path)?;
        Ok(self.run(Frame {
            content: Rc::from(content),
            offset: 0,
            data_index: 0,
            file: Some(Rc::from(path)),
            data: self.data.clone(),
            depth: 0,
        }))
    }

    fn run(&self, initial: Frame) -> String {
        let mut output = String::with_capacity(initial.text().len());
        let mut stack = vec![initial];

        while let Some(frame) = stack.pop() {
            self.scan(&frame, &mut output, &mut stack);
        }

        output
    }

    /// Scan one frame. Stops early when an include pushes new frames.
    fn scan(&self, frame: &Frame, output: &mut String, stack: &mut Vec<Frame>) {
        let text = frame.text();
        let mut last = 0;
        // A finished self-inclusion leaves the cursor past the last element.
        let mut cursor = frame.data_index;

        for directive in find_directives(text) {
            output.push_str(&text[last..directive.start]);
            last = directive.end();

            match directive.kind() {
                Some(DirectiveKind::Get) => {
                    let args = DirectiveArgs::parse(directive.raw_args);
                    output.push_str(&render_get(&args, &self.context(frame, cursor)));
                }
                Some(DirectiveKind::Call) => {
                    let args = DirectiveArgs::parse(directive.raw_args);
                    output.push_str(&render_call(&args, &self.context(frame, cursor)));
                }
                Some(DirectiveKind::Include) => {
                    let resume = cursor;
                    if let Some(included) = self.include(frame, &mut cursor, directive.raw_args) {
                        stack.push(frame.continuation(last, resume));
                        stack.push(included);
                        return;
                    }
                }
                None => {
                    tracing::debug!(directive = directive.name, "unknown directive");
                }
            }
        }

        output.push_str(&text[last..]);
    }

    fn context<'f>(&'f self, frame: &'f Frame, data_index: usize) -> ResolveContext<'f, H> {
        ResolveContext {
            host: self.host,
            env: self.env,
            extensions: self.extensions,
            data: frame.data.as_ref(),
            data_index,
        }
    }

    /// Build the frame for an included file, or `None` if the include is a
    /// no-op.
    ///
    /// A self-inclusion that runs past the end of the data list stores the
    /// advanced index in `cursor`.
    fn include(&self, frame: &Frame, cursor: &mut usize, raw_args: &str) -> Option<Frame> {
        let args = DirectiveArgs::parse(raw_args);
        let Some((_, raw_path)) = args.first() else {
            tracing::debug!(args = raw_args, "include directive without path");
            return None;
        };

        let path = self.host.localize_path(self.env, raw_path);
        let same_file = frame.file.as_deref() == Some(path.as_path());

        // Only distinct files nest; self-inclusion keeps the depth.
        let (data_index, data, depth) = if same_file {
            let next = *cursor + 1;
            match &frame.data {
                Some(list) if next < list.len() => (next, Some(list.clone()), frame.depth),
                _ => {
                    tracing::debug!(path = %path.display(), index = next, "self-inclusion finished");
                    *cursor = next;
                    return None;
                }
            }
        } else {
            let (data_index, data) = descend(frame.data.as_ref(), *cursor);
            (data_index, data, frame.depth + 1)
        };

        if let Some(max) = self.config.max_include_depth
            && depth > max
        {
            tracing::warn!(path = %path.display(), max, "maximum include depth exceeded");
            return None;
        }

        let content = match self.config.read(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "include target not readable");
                return None;
            }
        };

        Some(Frame {
            content: Rc::from(content),
            offset: 0,
            data_index,
            file: Some(Rc::from(path)),
            data,
            depth,
        })
    }
}

/// Data context for a file included at `data_index` that is not the
/// including frame's own file.
///
/// The cursor advances by one while it stays in range. When the element under
/// the advanced cursor is a nested list, the included file iterates over that
/// list from its start.
fn descend(data: Option<&DataList>, data_index: usize) -> (usize, Option<DataList>) {
    match data {
        Some(list) if data_index + 1 < list.len() => {
            let next = data_index + 1;
            match list.get(next) {
                Some(DataItem::List(nested)) => (0, Some(nested.clone())),
                _ => (next, Some(list.clone())),
            }
        }
        data => (data_index, data.cloned()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Attribute, DataObject, ScriptError};

    struct Site;

    impl ScriptHost for Site {
        type Env = ();

        fn localize_path(&self, _env: &(), path: &str) -> PathBuf {
            Path::new("/t").join(path)
        }

        fn translate(&self, _env: &(), text: &str) -> String {
            text.to_uppercase()
        }

        fn property(&self, name: &str) -> Option<Attribute> {
            (name == "Site").then(|| Attribute::new("X"))
        }

        fn invoke(&self, name: &str, _env: &()) -> Result<Option<String>, ScriptError> {
            Ok((name == "Greet").then(|| "hi".to_owned()))
        }
    }

    struct Named(&'static str);

    impl DataObject for Named {
        fn property(&self, name: &str) -> Result<Option<Attribute>, ScriptError> {
            Ok((name == "Name").then(|| Attribute::new(self.0)))
        }
    }

    fn names(items: &[&'static str]) -> DataList {
        items.iter().map(|n| DataItem::object(Named(*n))).collect()
    }

    fn files(entries: &[(&str, &str)]) -> ProcessorConfig {
        let files: HashMap<PathBuf, String> = entries
            .iter()
            .map(|(name, content)| (Path::new("/t").join(name), (*content).to_owned()))
            .collect();
        ProcessorConfig::new().with_read_file(move |path| {
            files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
        })
    }

    #[test]
    fn test_document_without_directives_is_unchanged() {
        let processor = Processor::new(&Site, &()).with_data(names(&["a", "b"]));
        let doc = "<html><!-- plain comment --><p>#get var=Site</p></html>";
        assert_eq!(processor.process(doc), doc);
    }

    #[test]
    fn test_get_var_in_place() {
        let processor = Processor::new(&Site, &());
        assert_eq!(processor.process("A<!-- #get var=Site -->B"), "AXB");
    }

    #[test]
    fn test_call_host_method() {
        let processor = Processor::new(&Site, &());
        assert_eq!(processor.process("<!-- #call method=Greet -->"), "hi");
    }

    #[test]
    fn test_unknown_directive_is_empty() {
        let processor = Processor::new(&Site, &());
        assert_eq!(processor.process("a<!-- #echo x=1 -->b"), "ab");
    }

    #[test]
    fn test_include_substitutes_in_place() {
        let processor = Processor::new(&Site, &())
            .with_config(files(&[("header.html", "<h>"), ("footer.html", "</h>")]));
        let doc = "<!-- #include file=header.html -->body<!-- #include file=footer.html -->";
        assert_eq!(processor.process(doc), "<h>body</h>");
    }

    #[test]
    fn test_nested_includes_keep_textual_order() {
        let processor = Processor::new(&Site, &()).with_config(files(&[
            ("outer.html", "[<!-- #include file=inner.html -->]"),
            ("inner.html", "(<!-- #get var=Site -->)"),
        ]));
        let doc = "1<!-- #include file=outer.html -->2<!-- #include file=inner.html -->3";
        assert_eq!(processor.process(doc), "1[(X)]2(X)3");
    }

    #[test]
    fn test_missing_include_is_deleted() {
        let processor = Processor::new(&Site, &()).with_config(files(&[]));
        let with = processor.process("x<!-- #include file=missing.html --><!-- #get var=Site -->y");
        let without = processor.process("x<!-- #get var=Site -->y");
        assert_eq!(with, without);
        assert_eq!(with, "xXy");
    }

    #[test]
    fn test_include_without_arguments_is_noop() {
        let processor = Processor::new(&Site, &()).with_config(files(&[]));
        assert_eq!(processor.process("a<!-- #include -->b"), "ab");
    }

    #[test]
    fn test_quoted_include_path_keeps_quotes() {
        let processor =
            Processor::new(&Site, &()).with_config(files(&[("row.html", "row")]));
        assert_eq!(processor.process(r#"<!-- #include file="row.html" -->"#), "");
    }

    #[test]
    fn test_self_inclusion_from_top_level_document() {
        let row = "Row<!-- #include file=F -->";
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b", "c"]))
            .with_config(files(&[("F", row)]));
        assert_eq!(processor.process(row), "RowRowRow");
    }

    #[test]
    fn test_self_inclusion_from_file() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b", "c"]))
            .with_config(files(&[("F", "Row<!-- #include file=F -->")]));
        assert_eq!(processor.process_file("/t/F").unwrap(), "RowRowRow");
    }

    #[test]
    fn test_self_inclusion_visits_each_element_in_order() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b", "c", "d"]))
            .with_config(files(&[(
                "row.html",
                "<li><!-- #get var=Name --></li><!-- #include file=row.html -->",
            )]));
        assert_eq!(
            processor.process_file("/t/row.html").unwrap(),
            "<li>a</li><li>b</li><li>c</li><li>d</li>"
        );
    }

    #[test]
    fn test_self_inclusion_without_data_renders_once() {
        let processor =
            Processor::new(&Site, &()).with_config(files(&[("F", "Row<!-- #include file=F -->")]));
        assert_eq!(processor.process_file("/t/F").unwrap(), "Row");
    }

    #[test]
    fn test_self_inclusion_continues_after_loop() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b"]))
            .with_config(files(&[(
                "row.html",
                "<!-- #get var=Name -->(<!-- #include file=row.html -->)",
            )]));
        assert_eq!(processor.process_file("/t/row.html").unwrap(), "a(b())");
    }

    #[test]
    fn test_distinct_include_advances_cursor() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b", "c"]))
            .with_config(files(&[(
                "row.html",
                "<!-- #get var=Name -->,<!-- #include file=row.html -->",
            )]));
        let doc = "<!-- #get var=Name -->[<!-- #include file=row.html -->]<!-- #get var=Name -->";
        assert_eq!(processor.process(doc), "a[b,c,]a");
    }

    #[test]
    fn test_distinct_include_at_last_element_keeps_cursor() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["only"]))
            .with_config(files(&[("leaf.html", "<!-- #get var=Name -->")]));
        assert_eq!(
            processor.process("<!-- #include file=leaf.html -->"),
            "only"
        );
    }

    #[test]
    fn test_distinct_include_descends_into_nested_list() {
        let data = DataList::new(vec![
            DataItem::object(Named("outer")),
            DataItem::List(names(&["in0", "in1"])),
        ]);
        let processor = Processor::new(&Site, &()).with_data(data).with_config(files(&[(
            "group.html",
            "<!-- #get var=Name --><!-- #include file=group.html -->",
        )]));
        let doc = "<!-- #get var=Name -->|<!-- #include file=group.html -->|<!-- #get var=Name -->";
        assert_eq!(processor.process(doc), "outer|in0in1|outer");
    }

    #[test]
    fn test_nested_list_descends_one_level_only() {
        let data = DataList::new(vec![
            DataItem::object(Named("top")),
            DataItem::List(DataList::new(vec![
                DataItem::object(Named("mid")),
                DataItem::List(names(&["deep"])),
            ])),
        ]);
        let processor = Processor::new(&Site, &()).with_data(data).with_config(files(&[
            ("a.html", "<!-- #get var=Name -->"),
            ("b.html", "<!-- #get var=Name -->/<!-- #include file=c.html -->"),
            ("c.html", "<!-- #get var=Name -->"),
        ]));
        // a.html enters the nested list at its start; c.html descends again.
        assert_eq!(processor.process("<!-- #include file=a.html -->"), "mid");
        assert_eq!(processor.process("<!-- #include file=b.html -->"), "mid/deep");
    }

    #[test]
    fn test_include_depth_limit_truncates() {
        let processor = Processor::new(&Site, &()).with_config(
            files(&[
                ("a.html", "A<!-- #include file=b.html -->"),
                ("b.html", "B<!-- #include file=a.html -->"),
            ])
            .with_max_include_depth(3),
        );
        assert_eq!(
            processor.process("<!-- #include file=a.html -->!"),
            "ABA!"
        );
    }

    #[test]
    fn test_include_depth_limit_does_not_bound_iteration() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b", "c", "d"]))
            .with_config(
                files(&[("row.html", "<!-- #get var=Name --><!-- #include file=row.html -->")])
                    .with_max_include_depth(2),
            );
        assert_eq!(processor.process_file("/t/row.html").unwrap(), "abcd");
    }

    #[test]
    fn test_self_inclusion_longer_than_default_depth_limit() {
        let rows = DEFAULT_MAX_INCLUDE_DEPTH * 2;
        let data: DataList = (0..rows).map(|_| DataItem::object(Named("r"))).collect();
        let processor = Processor::new(&Site, &())
            .with_data(data)
            .with_config(files(&[("F", "Row<!-- #include file=F -->")]));
        let output = processor.process_file("/t/F").unwrap();
        assert_eq!(output.matches("Row").count(), rows);
    }

    #[test]
    fn test_nested_iteration_counts_one_level_of_depth() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b", "c", "d"]))
            .with_config(
                files(&[
                    ("list.html", "<!-- #include file=row.html -->"),
                    ("row.html", "<!-- #get var=Name --><!-- #include file=row.html -->"),
                ])
                .with_max_include_depth(1),
            );
        assert_eq!(processor.process("<!-- #include file=list.html -->"), "");
        assert_eq!(processor.process_file("/t/list.html").unwrap(), "bcd");
    }

    #[test]
    fn test_finished_self_inclusion_leaves_no_current_object() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b"]))
            .with_config(files(&[(
                "row.html",
                "<!-- #get var=Name --><!-- #include file=row.html -->[<!-- #get var=Name -->]",
            )]));
        assert_eq!(processor.process_file("/t/row.html").unwrap(), "ab[][a]");
    }

    #[test]
    fn test_finished_self_inclusion_without_data_list() {
        let processor = Processor::new(&Site, &()).with_config(files(&[(
            "F",
            "<!-- #include file=F -->[<!-- #get var=Site -->]",
        )]));
        assert_eq!(processor.process_file("/t/F").unwrap(), "[X]");
    }

    #[test]
    fn test_source_path_sets_identity() {
        let row = "Row<!-- #include file=F -->";
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b"]))
            .with_config(files(&[("F", row)]).with_source_path("/t/F"));
        assert_eq!(processor.process(row), "RowRow");
    }

    #[test]
    fn test_process_file_missing() {
        let processor = Processor::new(&Site, &()).with_config(files(&[]));
        assert!(processor.process_file("/t/missing.html").is_err());
    }

    #[test]
    fn test_reads_from_filesystem_by_default() {
        struct Dir(PathBuf);

        impl ScriptHost for Dir {
            type Env = ();

            fn localize_path(&self, _env: &(), path: &str) -> PathBuf {
                self.0.join(path)
            }

            fn translate(&self, _env: &(), text: &str) -> String {
                text.to_owned()
            }
        }

        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("part.html"), "part").unwrap();
        let host = Dir(temp_dir.path().to_path_buf());

        let processor = Processor::new(&host, &());
        assert_eq!(
            processor.process("[<!-- #include file=part.html -->]"),
            "[part]"
        );
    }

    #[test]
    fn test_concurrent_renders_share_processor() {
        let processor = Processor::new(&Site, &())
            .with_data(names(&["a", "b", "c"]))
            .with_config(files(&[("row.html", "<!-- #get var=Name --><!-- #include file=row.html -->")]));

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| processor.process_file("/t/row.html").unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), "abc");
            }
        });
    }

    #[test]
    fn test_config_builder() {
        let config = ProcessorConfig::new()
            .with_source_path("/docs/page.html")
            .with_max_include_depth(5);
        assert_eq!(config.source_path, Some(PathBuf::from("/docs/page.html")));
        assert_eq!(config.max_include_depth, Some(5));
        assert_eq!(config.without_include_limit().max_include_depth, None);
    }

    #[test]
    fn test_default_depth_limit() {
        assert_eq!(
            ProcessorConfig::default().max_include_depth,
            Some(DEFAULT_MAX_INCLUDE_DEPTH)
        );
    }
}
