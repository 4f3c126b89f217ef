//! End-to-end stripping cases.

use pretty_assertions::assert_eq;
use typestrip_transformer::{transform, DiagnosticKind, ExtensionMap, SourceKind, TransformOptions};

fn options(kind: SourceKind) -> TransformOptions {
    TransformOptions {
        kind,
        ..Default::default()
    }
}

fn strip_ts(source: &str) -> String {
    transform(source, &options(SourceKind::Ts)).code
}

fn strip_tsx(source: &str) -> String {
    transform(source, &options(SourceKind::Tsx)).code
}

#[test]
fn greeting_component() {
    let source = "export interface Props { name: string; } const Greeting: React.FC<Props> = ({ name }) => <div>{name}</div>; export default Greeting;";
    insta::assert_snapshot!(
        strip_tsx(source),
        @"const Greeting = ({ name }) => <div>{name}</div>; export default Greeting;"
    );
}

#[test]
fn greeting_component_multiline() {
    let source = r#"import React from 'react';
import type { ReactNode } from 'react';
import { Card } from './Card.tsx';

/** Props for the greeting. */
export interface Props {
  name: string;
  children?: ReactNode;
}

const Greeting: React.FC<Props> = ({ name, children }) => (
  <Card title={name}>{children}</Card>
);

export default Greeting;
"#;
    let expected = r#"import React from 'react';
import { Card } from './Card.jsx';

const Greeting = ({ name, children }) => (
  <Card title={name}>{children}</Card>
);

export default Greeting;
"#;
    assert_eq!(strip_tsx(source), expected);
}

#[test]
fn untyped_input_is_unchanged() {
    let sources = [
        "export function sum(values) {\n  return values.reduce((a, b) => a + b, 0);\n}\n",
        "const label = count > 1 ? `${count} items` : 'one item';\n",
        "import './styles.css';\nimport { render } from 'react-dom';\n\n\nrender(<App />, root);\n",
        "const obj = { type: 'interface', as: 1, satisfies: true };\n",
    ];
    for source in sources {
        let result = transform(source, &options(SourceKind::Tsx));
        assert_eq!(result.code, source);
        assert!(!result.changed);
    }
}

#[test]
fn stripping_is_idempotent() {
    let sources = [
        "import { type A, b } from './m';\nconst x: A = b<number>(1) as A;\n",
        "interface X { a: { b: number } }\n\n\ntype Y = X;\nexport const z = 1;\n",
        "class C<T> implements I {\n  private x?: T;\n  constructor(public y: number) {}\n}\n",
    ];
    for source in sources {
        let once = strip_ts(source);
        assert_eq!(strip_ts(&once), once);
    }
}

#[test]
fn function_signature_body_is_untouched() {
    let body = "{\n  const total = items.length ? items[0] : fallback;\n  return { total, label: `n: ${total}` };\n}";
    let source = format!("function summarize(items: Item[], fallback: number): Summary {body}");
    assert_eq!(
        strip_ts(&source),
        format!("function summarize(items, fallback) {body}")
    );
}

#[test]
fn nested_braces_in_interface() {
    let source = "interface X { a: { b: number } }\nconst other = { c: { d: 1 } };\n";
    insta::assert_snapshot!(strip_ts(source).trim_end(), @"const other = { c: { d: 1 } };");
}

#[test]
fn ternary_is_not_an_annotation() {
    let source = "const x = cond ? a : b;\nconst y = a ? { k: 1 } : [b];\n";
    assert_eq!(strip_ts(source), source);
}

#[test]
fn import_splitting() {
    assert_eq!(
        strip_ts("import { type A, B } from \"m\";\n"),
        "import { B } from \"m\";\n"
    );
    assert_eq!(
        strip_ts("import { type A, type C } from \"m\";\nrun();\n"),
        "run();\n"
    );
    assert_eq!(
        strip_ts("import {\n  useState,\n  type Dispatch,\n  useEffect,\n} from 'react';\n"),
        "import {\n  useState,\n  useEffect,\n} from 'react';\n"
    );
}

#[test]
fn extension_rewriting() {
    let source = "import a from './a.ts';\nimport b from './b';\nimport c from 'c.ts';\nconst d = require('../d.tsx');\n";
    assert_eq!(
        strip_ts(source),
        "import a from './a.js';\nimport b from './b';\nimport c from 'c.ts';\nconst d = require('../d.jsx');\n"
    );
}

#[test]
fn custom_extension_map() {
    let options = TransformOptions {
        kind: SourceKind::Ts,
        extension_map: [("ts", "mjs")].into_iter().collect::<ExtensionMap>(),
        ..Default::default()
    };
    let result = transform("export * from './x.ts';\nexport * from './y.tsx';\n", &options);
    assert_eq!(
        result.code,
        "export * from './x.mjs';\nexport * from './y.tsx';\n"
    );
}

#[test]
fn nested_generic_annotations() {
    let source = "const table: Array<Record<string, number>> = [];\nlet pick: Map<string, Array<Set<number>>> | null = null;\n";
    assert_eq!(strip_ts(source), "const table = [];\nlet pick = null;\n");
}

#[test]
fn union_and_function_types() {
    let source = "let handler: ((e: Event) => void) | undefined;\nfunction on(cb: (a: string, b: { c: number }) => void): () => void { return cb; }\n";
    assert_eq!(
        strip_ts(source),
        "let handler;\nfunction on(cb) { return cb; }\n"
    );
}

#[test]
fn jsx_generics_and_comparisons() {
    let source = "const list = <List<Item> items={xs} />;\nconst ok = a < b && b > c;\n";
    assert_eq!(
        strip_tsx(source),
        "const list = <List items={xs} />;\nconst ok = a < b && b > c;\n"
    );
}

#[test]
fn blank_lines_collapse_only_at_removals() {
    let source = "const a = 1;\n\n\n\nconst b = 2;\n\ntype T = string;\n\n\nconst c = 3;\n";
    assert_eq!(
        strip_ts(source),
        "const a = 1;\n\n\n\nconst b = 2;\n\nconst c = 3;\n"
    );
}

#[test]
fn runtime_constructs_are_reported() {
    let source = "import fs = require('fs');\nnamespace Util { export const x = 1; }\nenum E { A }\nexport = Util;\n";
    let result = transform(source, &options(SourceKind::Ts));
    let reported: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.kind != DiagnosticKind::RecoveredParseError)
        .collect();
    let kinds: Vec<DiagnosticKind> = reported.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::ImportEquals,
            DiagnosticKind::Namespace,
            DiagnosticKind::Enum,
            DiagnosticKind::ExportAssignment,
        ]
    );
    assert_eq!(reported[2].line, 3);
    assert!(!result.used_fallback);
}

// The lexical fallback only handles statements; inline annotations in a file
// the parser rejects stay in the output.
#[test]
fn fallback_keeps_inline_annotations() {
    let source = "import type { A } from './a.ts';\ninterface B { c: { d: number } }\nfunction f(x: Array<Record<string, number>>) {\n  return x +;\n}\n";
    let result = transform(source, &options(SourceKind::Ts));
    assert!(result.used_fallback);
    let error = result.parse_error.expect("parse error is reported");
    assert_eq!(error.kind, DiagnosticKind::ParseError);
    assert_eq!(
        result.code,
        "function f(x: Array<Record<string, number>>) {\n  return x +;\n}\n"
    );
}
