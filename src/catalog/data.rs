//! Built-in catalog content

use serde::Serialize;

use super::{CatalogEntry, Filterable};
use crate::content::ViewNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewQuestion {
    pub question: &'static str,
    pub answer: &'static str,
    pub category: &'static str,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub title: &'static str,
    pub description: &'static str,
    pub language: &'static str,
    pub code: &'static str,
    pub tags: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookEntry {
    pub name: &'static str,
    pub summary: &'static str,
    pub signature: &'static str,
    pub example: &'static str,
    pub category: &'static str,
}

impl Filterable for InterviewQuestion {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.question, self.answer]
    }

    fn categories(&self) -> Vec<&str> {
        vec![self.category]
    }
}

impl Filterable for Snippet {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title, self.description, self.language]
    }

    fn categories(&self) -> Vec<&str> {
        self.tags.to_vec()
    }
}

impl Filterable for HookEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name, self.summary]
    }

    fn categories(&self) -> Vec<&str> {
        vec![self.category]
    }
}

fn chip(text: &str) -> ViewNode {
    ViewNode::new("span").class("chip").child(ViewNode::text(text))
}

fn code_block(language: &str, code: &str) -> ViewNode {
    ViewNode::new("pre")
        .class("md-code-block")
        .attr("data-lang", language)
        .child(
            ViewNode::new("code")
                .class(&format!("language-{}", language))
                .child(ViewNode::text(code)),
        )
}

impl CatalogEntry for InterviewQuestion {
    fn label(&self) -> &str {
        self.question
    }

    fn card(&self) -> ViewNode {
        ViewNode::new("details")
            .class("card")
            .child(
                ViewNode::new("summary")
                    .child(ViewNode::text(self.question))
                    .child(chip(self.category))
                    .child(chip(self.difficulty.as_str()).class(self.difficulty.as_str())),
            )
            .child(
                ViewNode::new("p")
                    .class("card-body")
                    .child(ViewNode::text(self.answer)),
            )
    }
}

impl CatalogEntry for Snippet {
    fn label(&self) -> &str {
        self.title
    }

    fn card(&self) -> ViewNode {
        let mut header = ViewNode::new("header")
            .child(ViewNode::new("h3").child(ViewNode::text(self.title)))
            .child(
                ViewNode::new("button")
                    .class("copy-button")
                    .attr("type", "button")
                    .attr("data-copy", self.code)
                    .child(ViewNode::text("Copy")),
            );
        for tag in self.tags {
            header = header.child(chip(tag));
        }
        ViewNode::new("section")
            .class("card")
            .child(header)
            .child(ViewNode::new("p").child(ViewNode::text(self.description)))
            .child(code_block(self.language, self.code))
    }
}

impl CatalogEntry for HookEntry {
    fn label(&self) -> &str {
        self.name
    }

    fn card(&self) -> ViewNode {
        ViewNode::new("section")
            .class("card")
            .child(
                ViewNode::new("header")
                    .child(
                        ViewNode::new("h3")
                            .child(ViewNode::new("code").child(ViewNode::text(self.name))),
                    )
                    .child(chip(self.category)),
            )
            .child(ViewNode::new("p").child(ViewNode::text(self.summary)))
            .child(
                ViewNode::new("p").child(
                    ViewNode::new("code")
                        .class("md-code-inline")
                        .child(ViewNode::text(self.signature)),
                ),
            )
            .child(code_block("jsx", self.example))
    }
}

pub static QUESTIONS: &[InterviewQuestion] = &[
    InterviewQuestion {
        question: "What is the virtual DOM and why does React use it?",
        answer: "An in-memory tree of elements. React diffs the new tree against the previous one and applies only the minimal set of DOM mutations.",
        category: "React",
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        question: "Why do list items need a key prop?",
        answer: "Keys give elements a stable identity across renders so React can match, reorder and preserve state of children instead of recreating them.",
        category: "React",
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        question: "What are the rules of hooks?",
        answer: "Only call hooks at the top level of a function component or custom hook, never inside loops, conditions or nested functions, so call order stays stable.",
        category: "React",
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        question: "When would you reach for useMemo or useCallback?",
        answer: "To keep a computed value or function identity stable between renders when it is expensive to recompute or passed to memoized children.",
        category: "React",
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        question: "How does reconciliation decide to remount a subtree?",
        answer: "When the element type at a position changes, or its key changes, React unmounts the old subtree and mounts a fresh one.",
        category: "React",
        difficulty: Difficulty::Hard,
    },
    InterviewQuestion {
        question: "What is a closure?",
        answer: "A function bundled with references to the variables of the scope it was created in, which stay alive as long as the function does.",
        category: "JavaScript",
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        question: "Explain the difference between == and ===.",
        answer: "== compares after type coercion; === compares value and type without coercion.",
        category: "JavaScript",
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        question: "How does the event loop order microtasks and macrotasks?",
        answer: "After each macrotask the engine drains the whole microtask queue (promise callbacks, queueMicrotask) before rendering or taking the next macrotask.",
        category: "JavaScript",
        difficulty: Difficulty::Hard,
    },
    InterviewQuestion {
        question: "What does 'this' refer to inside an arrow function?",
        answer: "Arrow functions have no own this; they capture it lexically from the enclosing scope.",
        category: "JavaScript",
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        question: "What is middleware in Express?",
        answer: "A function (req, res, next) in the request pipeline that can read or modify the request and response, end the cycle, or call next().",
        category: "Node.js",
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        question: "How do streams help with large files in Node.js?",
        answer: "They process data in chunks with backpressure instead of buffering the whole file in memory.",
        category: "Node.js",
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        question: "What is the difference between process.nextTick and setImmediate?",
        answer: "nextTick callbacks run before the event loop continues, ahead of promise microtasks; setImmediate runs in the check phase after I/O polling.",
        category: "Node.js",
        difficulty: Difficulty::Hard,
    },
];

pub static SNIPPETS: &[Snippet] = &[
    Snippet {
        title: "Debounced value hook",
        description: "Delay updating a value until input has settled.",
        language: "jsx",
        code: "function useDebounce(value, delay = 300) {\n  const [debounced, setDebounced] = useState(value);\n  useEffect(() => {\n    const id = setTimeout(() => setDebounced(value), delay);\n    return () => clearTimeout(id);\n  }, [value, delay]);\n  return debounced;\n}\n",
        tags: &["react", "hooks"],
    },
    Snippet {
        title: "Fetch with abort on unmount",
        description: "Cancel an in-flight request when the component unmounts or the URL changes.",
        language: "jsx",
        code: "useEffect(() => {\n  const controller = new AbortController();\n  fetch(url, { signal: controller.signal })\n    .then((res) => res.text())\n    .then(setText)\n    .catch((err) => err.name !== 'AbortError' && setError(err.message));\n  return () => controller.abort();\n}, [url]);\n",
        tags: &["react", "hooks", "async"],
    },
    Snippet {
        title: "Local storage state",
        description: "useState that persists to localStorage.",
        language: "jsx",
        code: "function useLocalStorage(key, initial) {\n  const [value, setValue] = useState(() => {\n    const stored = localStorage.getItem(key);\n    return stored !== null ? JSON.parse(stored) : initial;\n  });\n  useEffect(() => localStorage.setItem(key, JSON.stringify(value)), [key, value]);\n  return [value, setValue];\n}\n",
        tags: &["react", "hooks"],
    },
    Snippet {
        title: "Copy to clipboard",
        description: "Write text to the clipboard and report success.",
        language: "js",
        code: "async function copy(text) {\n  try {\n    await navigator.clipboard.writeText(text);\n    return true;\n  } catch {\n    return false;\n  }\n}\n",
        tags: &["javascript", "browser"],
    },
    Snippet {
        title: "Group array by key",
        description: "Build an object of arrays keyed by a property.",
        language: "js",
        code: "const groupBy = (items, key) =>\n  items.reduce((acc, item) => {\n    (acc[item[key]] ||= []).push(item);\n    return acc;\n  }, {});\n",
        tags: &["javascript"],
    },
    Snippet {
        title: "Promise timeout",
        description: "Reject a promise that does not settle in time.",
        language: "js",
        code: "const withTimeout = (promise, ms) =>\n  Promise.race([\n    promise,\n    new Promise((_, reject) => setTimeout(() => reject(new Error('timeout')), ms)),\n  ]);\n",
        tags: &["javascript", "async"],
    },
    Snippet {
        title: "Express error handler",
        description: "Central error middleware that returns JSON.",
        language: "js",
        code: "app.use((err, req, res, next) => {\n  console.error(err);\n  res.status(err.status || 500).json({ error: err.message });\n});\n",
        tags: &["node", "express"],
    },
    Snippet {
        title: "Read a file line by line",
        description: "Stream a large file with readline.",
        language: "js",
        code: "const rl = readline.createInterface({ input: fs.createReadStream(path) });\nfor await (const line of rl) {\n  handle(line);\n}\n",
        tags: &["node", "async"],
    },
];

pub static HOOKS: &[HookEntry] = &[
    HookEntry {
        name: "useState",
        summary: "Adds a state variable to a component.",
        signature: "const [state, setState] = useState(initialState)",
        example: "const [count, setCount] = useState(0);\n<button onClick={() => setCount((c) => c + 1)}>{count}</button>\n",
        category: "State",
    },
    HookEntry {
        name: "useReducer",
        summary: "Manages state through a reducer function for complex transitions.",
        signature: "const [state, dispatch] = useReducer(reducer, initialArg, init?)",
        example: "const [todos, dispatch] = useReducer(todosReducer, []);\ndispatch({ type: 'added', text });\n",
        category: "State",
    },
    HookEntry {
        name: "useEffect",
        summary: "Synchronizes a component with an external system after render.",
        signature: "useEffect(setup, dependencies?)",
        example: "useEffect(() => {\n  const conn = connect(roomId);\n  return () => conn.disconnect();\n}, [roomId]);\n",
        category: "Effects",
    },
    HookEntry {
        name: "useLayoutEffect",
        summary: "Like useEffect but fires before the browser repaints.",
        signature: "useLayoutEffect(setup, dependencies?)",
        example: "useLayoutEffect(() => {\n  setHeight(ref.current.getBoundingClientRect().height);\n}, []);\n",
        category: "Effects",
    },
    HookEntry {
        name: "useRef",
        summary: "Holds a mutable value that does not trigger re-renders, or a DOM node.",
        signature: "const ref = useRef(initialValue)",
        example: "const inputRef = useRef(null);\n<input ref={inputRef} />\ninputRef.current.focus();\n",
        category: "Refs",
    },
    HookEntry {
        name: "useImperativeHandle",
        summary: "Customizes the handle exposed through a ref.",
        signature: "useImperativeHandle(ref, createHandle, dependencies?)",
        example: "useImperativeHandle(ref, () => ({ focus: () => inputRef.current.focus() }), []);\n",
        category: "Refs",
    },
    HookEntry {
        name: "useMemo",
        summary: "Caches the result of a calculation between renders.",
        signature: "const value = useMemo(calculateValue, dependencies)",
        example: "const visible = useMemo(() => filterTodos(todos, tab), [todos, tab]);\n",
        category: "Performance",
    },
    HookEntry {
        name: "useCallback",
        summary: "Caches a function definition between renders.",
        signature: "const fn = useCallback(fn, dependencies)",
        example: "const onSubmit = useCallback((order) => post(order), [productId]);\n",
        category: "Performance",
    },
    HookEntry {
        name: "useTransition",
        summary: "Marks a state update as non-blocking.",
        signature: "const [isPending, startTransition] = useTransition()",
        example: "startTransition(() => setTab(next));\n",
        category: "Performance",
    },
    HookEntry {
        name: "useContext",
        summary: "Reads and subscribes to a context value.",
        signature: "const value = useContext(SomeContext)",
        example: "const theme = useContext(ThemeContext);\n",
        category: "Context",
    },
];
