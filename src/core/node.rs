//! Lazy namespace nodes
//!
//! A [`LazyNode`] is the attribute-addressable object representing one file
//! or directory of an imported repository. Directory children materialize on
//! first access; file content is executed on first attribute access and at
//! most once per node, so top-level side effects happen exactly once.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::NodeError;
use crate::eval::{EvalError, Namespace, SourceEngine, Value};

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A source file; resolves to a namespace of top-level bindings
    File,
    /// A directory; holds child nodes
    Directory,
}

/// Result of an attribute lookup on a node
#[derive(Debug, Clone)]
pub enum Attr {
    /// A child module or package
    Module(Arc<LazyNode>),
    /// A value from a resolved file namespace
    Value(Value),
}

impl Attr {
    /// The child node, if this attribute is one
    pub fn as_module(&self) -> Option<&Arc<LazyNode>> {
        match self {
            Self::Module(node) => Some(node),
            Self::Value(_) => None,
        }
    }

    /// The value, if this attribute is one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Module(_) => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// One entry of a directory node
///
/// Files start as bare path references and are promoted to nodes exactly
/// once, on first access. Subdirectories are scanned up front and are nodes
/// from the start.
enum ChildEntry {
    FileRef(PathBuf),
    Node(Arc<LazyNode>),
}

/// Resolution state
enum NodeState {
    /// Directory children, keyed by child name
    Children(BTreeMap<String, ChildEntry>),
    /// File not yet executed
    Unresolved,
    /// File executed; bindings captured (terminal state)
    Resolved(Arc<Namespace>),
}

/// A lazily-evaluated namespace node
pub struct LazyNode {
    /// Dotted logical name, e.g. `repo.lib.math_ext`
    name: String,
    /// Backing path on the local filesystem
    path: PathBuf,
    kind: NodeKind,
    engine: Arc<dyn SourceEngine>,
    state: Mutex<NodeState>,
}

impl LazyNode {
    /// Create an unresolved file node
    pub(crate) fn file(name: String, path: PathBuf, engine: Arc<dyn SourceEngine>) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::File,
            engine,
            state: Mutex::new(NodeState::Unresolved),
        }
    }

    /// Create a directory node from scanned children
    pub(crate) fn directory(
        name: String,
        path: PathBuf,
        engine: Arc<dyn SourceEngine>,
        children: BTreeMap<String, Arc<LazyNode>>,
        file_refs: BTreeMap<String, PathBuf>,
    ) -> Self {
        let mut entries: BTreeMap<String, ChildEntry> = BTreeMap::new();
        for (child_name, node) in children {
            entries.insert(child_name, ChildEntry::Node(node));
        }
        for (child_name, file_path) in file_refs {
            entries.insert(child_name, ChildEntry::FileRef(file_path));
        }
        Self {
            name,
            path,
            kind: NodeKind::Directory,
            engine,
            state: Mutex::new(NodeState::Children(entries)),
        }
    }

    /// Dotted logical name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing filesystem path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Node kind
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// True for file nodes
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// True if this file node has already executed its content
    ///
    /// Directory nodes are never "resolved" in this sense.
    pub fn is_resolved(&self) -> bool {
        matches!(*self.state(), NodeState::Resolved(_))
    }

    /// Look up an attribute
    ///
    /// On a directory node this returns the named child, materializing a
    /// file reference into a node the first time and reusing it afterwards.
    /// On a file node this forces resolution and returns the bound value.
    pub fn get(&self, name: &str) -> Result<Attr, NodeError> {
        match self.kind {
            NodeKind::Directory => self.get_child(name).map(Attr::Module),
            NodeKind::File => {
                let namespace = self.resolve()?;
                namespace
                    .get(name)
                    .cloned()
                    .map(Attr::Value)
                    .ok_or_else(|| NodeError::AttributeNotFound {
                        module: self.name.clone(),
                        name: name.to_string(),
                    })
            }
        }
    }

    /// Walk a dotted path of attribute accesses starting at this node
    pub fn get_path(self: &Arc<Self>, dotted: &str) -> Result<Attr, NodeError> {
        let mut current = Attr::Module(Arc::clone(self));
        for segment in dotted.split('.').filter(|s| !s.is_empty()) {
            match current {
                Attr::Module(node) => {
                    current = node.get(segment)?;
                }
                Attr::Value(_) => {
                    // Values have no attributes of their own
                    return Err(NodeError::AttributeNotFound {
                        module: self.name.clone(),
                        name: segment.to_string(),
                    });
                }
            }
        }
        Ok(current)
    }

    /// List available names
    ///
    /// For a directory node: the child names, without materializing anything.
    /// For a file node: the resolved namespace's names, forcing resolution.
    pub fn names(&self) -> Result<Vec<String>, NodeError> {
        match self.kind {
            NodeKind::Directory => match &*self.state() {
                NodeState::Children(entries) => Ok(entries.keys().cloned().collect()),
                _ => Ok(Vec::new()),
            },
            NodeKind::File => Ok(self.resolve()?.names()),
        }
    }

    /// Fully resolve a file node, executing its content if needed
    ///
    /// Execution happens at most once; on failure the node stays unresolved
    /// and the next call retries. Directory nodes cannot be resolved.
    pub fn resolve(&self) -> Result<Arc<Namespace>, NodeError> {
        let mut state = self.state();
        match &*state {
            NodeState::Resolved(namespace) => Ok(Arc::clone(namespace)),
            NodeState::Children(_) => Err(NodeError::NotAFile {
                module: self.name.clone(),
            }),
            NodeState::Unresolved => {
                debug!(module = %self.name, path = %self.path.display(), "resolving module");
                let source =
                    std::fs::read_to_string(&self.path).map_err(|e| NodeError::ReadFile {
                        path: self.path.clone(),
                        error: e.to_string(),
                    })?;
                let namespace = self
                    .engine
                    .evaluate(&self.name, &source)
                    .map_err(|source| NodeError::Execution {
                        module: self.name.clone(),
                        source,
                    })?;
                let namespace = Arc::new(namespace);
                *state = NodeState::Resolved(Arc::clone(&namespace));
                Ok(namespace)
            }
        }
    }

    /// Call a function defined at the top level of this file node
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, NodeError> {
        let namespace = self.resolve()?;
        namespace.call(name, args).map_err(|e| match e {
            EvalError::Undefined { name } => NodeError::AttributeNotFound {
                module: self.name.clone(),
                name,
            },
            EvalError::NotCallable { name } => NodeError::NotCallable {
                module: self.name.clone(),
                name,
            },
            source => NodeError::Call {
                module: self.name.clone(),
                name: name.to_string(),
                source,
            },
        })
    }

    /// Get a child of a directory node, materializing it on first access
    fn get_child(&self, name: &str) -> Result<Arc<LazyNode>, NodeError> {
        let mut state = self.state();
        let NodeState::Children(entries) = &mut *state else {
            return Err(NodeError::AttributeNotFound {
                module: self.name.clone(),
                name: name.to_string(),
            });
        };

        let Some(entry) = entries.get_mut(name) else {
            return Err(NodeError::AttributeNotFound {
                module: self.name.clone(),
                name: name.to_string(),
            });
        };

        match entry {
            ChildEntry::Node(node) => Ok(Arc::clone(node)),
            ChildEntry::FileRef(path) => {
                debug!(module = %self.name, child = name, "materializing file node");
                let node = Arc::new(LazyNode::file(
                    format!("{}.{name}", self.name),
                    path.clone(),
                    Arc::clone(&self.engine),
                ));
                *entry = ChildEntry::Node(Arc::clone(&node));
                Ok(node)
            }
        }
    }

    /// Lock the state, recovering from a poisoned mutex
    ///
    /// The node state is never left inconsistent mid-update, so the value
    /// inside a poisoned lock is still valid.
    fn state(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for LazyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyNode")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for LazyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::File => write!(f, "<module '{}' from '{}'>", self.name, self.path.display()),
            NodeKind::Directory => {
                write!(f, "<package '{}' from '{}'>", self.name, self.path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ScriptEngine;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Engine wrapper that counts evaluations
    struct CountingEngine {
        inner: ScriptEngine,
        calls: AtomicUsize,
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                inner: ScriptEngine::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SourceEngine for CountingEngine {
        fn evaluate(&self, module: &str, source: &str) -> Result<Namespace, EvalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.evaluate(module, source)
        }
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn file_node(path: PathBuf, engine: Arc<dyn SourceEngine>) -> LazyNode {
        LazyNode::file("repo.utils".to_string(), path, engine)
    }

    #[test]
    fn test_file_node_resolves_on_access() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "utils.lzy", "let answer = 42;");
        let node = file_node(path, Arc::new(ScriptEngine::new()));

        assert!(!node.is_resolved());
        let attr = node.get("answer").unwrap();
        assert_eq!(attr.as_value(), Some(&Value::Int(42)));
        assert!(node.is_resolved());
    }

    #[test]
    fn test_file_node_executes_exactly_once() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "utils.lzy", "let a = 1;\nlet b = 2;");
        let engine = Arc::new(CountingEngine::new());
        let node = file_node(path, engine.clone());

        let first = node.get("a").unwrap();
        let second = node.get("a").unwrap();
        node.get("b").unwrap();
        node.names().unwrap();

        assert_eq!(engine.count(), 1);
        assert_eq!(first.as_value(), second.as_value());
    }

    #[test]
    fn test_repeated_resolution_returns_same_namespace() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "utils.lzy", "fn id(x) { x }");
        let node = file_node(path, Arc::new(ScriptEngine::new()));

        let first = node.resolve().unwrap();
        let second = node.resolve().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Function values from repeated lookups are reference-equal
        assert_eq!(first.get("id"), second.get("id"));
    }

    #[test]
    fn test_file_node_missing_attribute() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "utils.lzy", "let x = 1;");
        let node = file_node(path, Arc::new(ScriptEngine::new()));

        let err = node.get("missing").unwrap_err();
        match err {
            NodeError::AttributeNotFound { module, name } => {
                assert_eq!(module, "repo.utils");
                assert_eq!(name, "missing");
            }
            e => panic!("Expected AttributeNotFound, got: {e:?}"),
        }
    }

    #[test]
    fn test_execution_failure_leaves_node_unresolved() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.lzy", "let x = ;");
        let engine = Arc::new(CountingEngine::new());
        let node = file_node(path.clone(), engine.clone());

        let err = node.get("x").unwrap_err();
        assert!(matches!(err, NodeError::Execution { .. }));
        assert!(!node.is_resolved());

        // Retry is permitted; identical failure expected
        let err = node.get("x").unwrap_err();
        assert!(matches!(err, NodeError::Execution { .. }));
        assert_eq!(engine.count(), 2);

        // Fixing the file makes a retry succeed
        std::fs::write(&path, "let x = 1;").unwrap();
        assert_eq!(node.get("x").unwrap().as_value(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_directory_children_materialize_once() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "utils.lzy", "let x = 1;");
        let engine: Arc<dyn SourceEngine> = Arc::new(ScriptEngine::new());
        let mut file_refs = BTreeMap::new();
        file_refs.insert("utils".to_string(), path);
        let node = LazyNode::directory(
            "repo".to_string(),
            dir.path().to_path_buf(),
            engine,
            BTreeMap::new(),
            file_refs,
        );

        let first = node.get("utils").unwrap();
        let second = node.get("utils").unwrap();
        let (Attr::Module(first), Attr::Module(second)) = (first, second) else {
            panic!("Expected module attributes");
        };
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "repo.utils");
        // Materialization alone does not execute the file
        assert!(!first.is_resolved());
    }

    #[test]
    fn test_directory_unknown_child() {
        let engine: Arc<dyn SourceEngine> = Arc::new(ScriptEngine::new());
        let node = LazyNode::directory(
            "repo".to_string(),
            PathBuf::from("/tmp/repo"),
            engine,
            BTreeMap::new(),
            BTreeMap::new(),
        );

        let err = node.get("missing").unwrap_err();
        assert!(matches!(err, NodeError::AttributeNotFound { .. }));
    }

    #[test]
    fn test_directory_names_do_not_materialize() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "utils.lzy", "let x = 1;");
        let engine = Arc::new(CountingEngine::new());
        let mut file_refs = BTreeMap::new();
        file_refs.insert("utils".to_string(), path);
        let node = LazyNode::directory(
            "repo".to_string(),
            dir.path().to_path_buf(),
            engine.clone(),
            BTreeMap::new(),
            file_refs,
        );

        assert_eq!(node.names().unwrap(), vec!["utils"]);
        assert_eq!(engine.count(), 0);
    }

    #[test]
    fn test_resolve_on_directory_fails() {
        let engine: Arc<dyn SourceEngine> = Arc::new(ScriptEngine::new());
        let node = LazyNode::directory(
            "repo".to_string(),
            PathBuf::from("/tmp/repo"),
            engine,
            BTreeMap::new(),
            BTreeMap::new(),
        );
        assert!(matches!(node.resolve(), Err(NodeError::NotAFile { .. })));
    }

    #[test]
    fn test_call_function_in_file_node() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "utils.lzy", "fn add(a, b) { a + b }\nlet k = 3;");
        let node = file_node(path, Arc::new(ScriptEngine::new()));

        let result = node.call("add", &[Value::Int(2), Value::Int(3)]).unwrap();
        assert_eq!(result, Value::Int(5));

        let err = node.call("k", &[]).unwrap_err();
        assert!(matches!(err, NodeError::NotCallable { .. }));

        let err = node.call("nope", &[]).unwrap_err();
        assert!(matches!(err, NodeError::AttributeNotFound { .. }));

        let err = node.call("add", &[Value::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            NodeError::Call {
                source: EvalError::Arity { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_read_error() {
        let node = file_node(
            PathBuf::from("/nonexistent/utils.lzy"),
            Arc::new(ScriptEngine::new()),
        );
        let err = node.resolve().unwrap_err();
        assert!(matches!(err, NodeError::ReadFile { .. }));
    }

    #[test]
    fn test_display() {
        let node = file_node(PathBuf::from("/r/utils.lzy"), Arc::new(ScriptEngine::new()));
        assert_eq!(
            node.to_string(),
            "<module 'repo.utils' from '/r/utils.lzy'>"
        );
    }
}
