//! End-to-end regeneration against scratch projects.

use std::fs;
use std::path::{Path, PathBuf};

use dts_rewrap::{Config, GenerateError, Project};

const COMPILER_DTS: &str = r#"/// <reference lib="es2020" />
declare namespace ts {
    const versionMajorMinor = "5.4";
    /** The version of the TypeScript compiler release */
    const version: string;
    /**
     * Kinds of syntax nodes.
     */
    enum SyntaxKind {
        Unknown = 0,
        EndOfFileToken = 1,
        Identifier = 80
    }
    enum ScriptTarget {
        ES5 = 1,
        ESNext = 99,
        Latest = 99
    }
    enum EmitFlags {
        None = 0
    }
    interface TextRange {
        pos: number;
        end: number;
    }
    interface Node extends TextRange {
        readonly kind: SyntaxKind;
        readonly parent: Node;
        getSourceFile(): SourceFile;
    }
    interface SourceFile extends Node {
        readonly fileName: string;
    }
    interface JsonSourceFile extends SourceFile {
    }
    type CompilerOptionsValue = string | number | boolean | (string | number)[] | string[] | MapLike<string[]> | null | undefined;
    interface CompilerOptions {
        allowJs?: boolean;
        target?: ScriptTarget;
        [option: string]: CompilerOptionsValue | JsonSourceFile | TsConfigSourceFile | undefined;
    }
    interface MapLike<T> {
        [index: string]: T;
    }
    type TsConfigSourceFile = JsonSourceFile;
    class OperationCanceledException {
    }
    function isIdentifier(node: Node): node is Identifier;
    namespace server {
        namespace protocol {
            enum CommandTypes {
                Brace = "brace"
            }
        }
        function createSession(): void;
        interface ServerHost {
        }
    }
}
declare namespace other {
    interface Node {
    }
}
declare namespace ts {
    interface Identifier extends Node {
        readonly escapedText: string;
    }
    function createPrinter(): Printer;
    interface Printer {
        printFile(sourceFile: SourceFile): string;
    }
}
export = ts;
"#;

fn scratch_project(dts: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("node_modules/typescript/lib");
    fs::create_dir_all(&lib).unwrap();
    fs::write(lib.join("typescript.d.ts"), dts).unwrap();
    fs::write(
        dir.path().join("node_modules/typescript/package.json"),
        r#"{ "name": "typescript", "version": "5.4.5" }"#,
    )
    .unwrap();
    dir
}

fn regenerate(root: &Path) -> (PathBuf, String) {
    let project = Project::open(root).expect("project should open");
    let path = project.regenerate().expect("regeneration should succeed");
    let text = fs::read_to_string(&path).unwrap();
    (path, text)
}

/// Split the output into the text before the wrapping namespace and the
/// namespace body.
fn split_at_namespace(text: &str) -> (&str, &str) {
    let start = text
        .find("export namespace ts {")
        .expect("wrapping namespace should be present");
    text.split_at(start)
}

#[test]
fn test_output_path_and_layout() {
    let dir = scratch_project(COMPILER_DTS);
    let (path, text) = regenerate(dir.path());

    assert_eq!(path, dir.path().join("src/typescript/typescript.ts"));
    assert!(text.starts_with("/* eslint-disable */\r\n"));
    assert!(text.contains("version 5.4.5"));
    assert!(text.contains("import * as tsCompiler from \"typescript\";\r\nimport { ObjectUtils } from \"../utils\";\r\n"));
    assert!(text.ends_with("    ObjectUtils.assign(ts, tsCompiler);\r\n}\r\n"));
    assert_eq!(text.matches("export namespace ts {").count(), 1);
}

#[test]
fn test_partition_is_complete_and_exclusive() {
    let dir = scratch_project(COMPILER_DTS);
    let (_, text) = regenerate(dir.path());
    let (top, namespace) = split_at_namespace(&text);

    for hoisted in [
        "export declare enum SyntaxKind {",
        "export declare enum ScriptTarget {",
        "export interface CompilerOptions {",
        "export interface MapLike<T> {",
    ] {
        assert!(top.contains(hoisted), "{hoisted} should be hoisted");
        assert!(!namespace.contains(hoisted), "{hoisted} should not be nested");
    }

    for nested in [
        "    export declare enum EmitFlags {",
        "    export interface Node extends TextRange {",
        "    export type CompilerOptionsValue =",
        "    export declare class OperationCanceledException {",
        "    export declare function isIdentifier(node: Node): node is Identifier;",
        "    export declare const versionMajorMinor = \"5.4\";",
        "    export declare namespace server {",
    ] {
        assert!(namespace.contains(nested), "{nested} should be nested");
        assert!(!top.contains(nested.trim_start()), "{nested} should not be hoisted");
    }
}

#[test]
fn test_nested_namespaces_are_ambient() {
    let dir = scratch_project(COMPILER_DTS);
    let (_, text) = regenerate(dir.path());

    assert!(text.contains(
        "    export declare namespace server {\r\n        export namespace protocol {\r\n            export enum CommandTypes {\r\n"
    ));
    assert!(text.contains("        export interface ServerHost {\r\n"));
    assert!(text.contains("        export function createSession(): void;\r\n"));
}

#[test]
fn test_flattened_namespaces_appear_once() {
    let dir = scratch_project(COMPILER_DTS);
    let (_, text) = regenerate(dir.path());
    let (_, namespace) = split_at_namespace(&text);

    assert_eq!(namespace.matches("export interface Identifier extends Node {").count(), 1);
    assert_eq!(namespace.matches("export declare function createPrinter(): Printer;").count(), 1);
    assert_eq!(text.matches("interface Node ").count(), 1, "other.Node is not copied");

    // Interfaces from the second `ts` block follow those of the first.
    let source_file = namespace.find("export interface SourceFile").unwrap();
    let identifier = namespace.find("export interface Identifier").unwrap();
    assert!(source_file < identifier);
}

#[test]
fn test_union_rewrite() {
    let dir = scratch_project(COMPILER_DTS);
    let (_, text) = regenerate(dir.path());

    assert!(text.contains(
        "    [option: string]: ts.CompilerOptionsValue | ts.JsonSourceFile | TsConfigSourceFile | undefined;\r\n"
    ));
    assert!(!text.contains("ts.TsConfigSourceFile"));
}

#[test]
fn test_brand_on_exactly_one_interface() {
    let dir = scratch_project(COMPILER_DTS);
    let (_, text) = regenerate(dir.path());

    assert_eq!(text.matches("_compilerBrand").count(), 1);
    let node = text.find("export interface Node extends TextRange {").unwrap();
    let brand = text.find("        _compilerBrand: undefined;\r\n").unwrap();
    let source_file = text.find("export interface SourceFile").unwrap();
    assert!(node < brand && brand < source_file);
}

#[test]
fn test_docs_are_kept() {
    let dir = scratch_project(COMPILER_DTS);
    let (_, text) = regenerate(dir.path());

    assert!(text.contains("    /** The version of the TypeScript compiler release */\r\n    export declare const version: string;\r\n"));
    assert!(text.contains("/** Kinds of syntax nodes. */\r\nexport declare enum SyntaxKind {\r\n"));
}

#[test]
fn test_only_crlf_line_endings() {
    let dir = scratch_project(&COMPILER_DTS.replace('\n', "\r\n"));
    let (_, text) = regenerate(dir.path());

    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'\r' => assert_eq!(bytes.get(i + 1), Some(&b'\n'), "lone \\r at {i}"),
            b'\n' => assert!(i > 0 && bytes[i - 1] == b'\r', "lone \\n at {i}"),
            _ => {}
        }
    }
}

#[test]
fn test_regeneration_is_byte_identical() {
    let dir = scratch_project(COMPILER_DTS);
    let (path, first) = regenerate(dir.path());
    let (_, second) = regenerate(dir.path());

    assert_eq!(first, second);
    assert_eq!(fs::read(&path).unwrap(), second.as_bytes());
}

#[test]
fn test_stale_output_is_replaced_not_merged() {
    let dir = scratch_project(COMPILER_DTS);
    let output = dir.path().join("src/typescript/typescript.ts");
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    fs::write(&output, "export const stale = true;\n").unwrap();

    let (_, text) = regenerate(dir.path());
    assert!(!text.contains("stale"));
}

#[test]
fn test_missing_brand_interface_leaves_destination_untouched() {
    let dts = COMPILER_DTS.replace("interface Node extends TextRange", "interface Nodule extends TextRange");
    let dir = scratch_project(&dts);
    let output = dir.path().join("src/typescript/typescript.ts");
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    fs::write(&output, "previous\r\n").unwrap();

    let err = Project::open(dir.path()).unwrap().regenerate().unwrap_err();
    assert!(matches!(err, GenerateError::BrandTargetMissing(ref name) if name == "Node"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous\r\n");
}

#[test]
fn test_missing_rewrite_target_writes_nothing() {
    let dts = COMPILER_DTS.replace(
        "[option: string]: CompilerOptionsValue | JsonSourceFile | TsConfigSourceFile | undefined;",
        "",
    );
    let dir = scratch_project(&dts);

    let err = Project::open(dir.path()).unwrap().regenerate().unwrap_err();
    assert!(matches!(err, GenerateError::RewriteTargetMissing { .. }));
    assert!(!dir.path().join("src/typescript/typescript.ts").exists());
}

#[test]
fn test_missing_source_namespace() {
    let dir = scratch_project("declare namespace other { interface Node {} }");
    let err = Project::open(dir.path()).unwrap().regenerate().unwrap_err();
    assert!(matches!(err, GenerateError::MissingNamespace(ref name) if name == "ts"));
}

#[test]
fn test_parse_error_is_reported() {
    let dir = scratch_project("declare namespace ts { interface A { x: ; } }");
    let err = Project::open(dir.path()).unwrap().regenerate().unwrap_err();
    match err {
        GenerateError::Parse { path, source, .. } => {
            assert!(path.ends_with("typescript.d.ts"));
            assert_eq!(source.pos, 40);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_config_file_is_honoured() {
    let dir = scratch_project(COMPILER_DTS);
    fs::write(
        dir.path().join("dts-rewrap.toml"),
        r#"
output = "generated/compiler.ts"
merge_utility = "Merge"
merge_utility_module = "./merge"

[separate]
enums = ["EmitFlags"]

[brand]
interface = "SourceFile"
property = "_brand"
"#,
    )
    .unwrap();

    let (path, text) = regenerate(dir.path());
    assert_eq!(path, dir.path().join("generated/compiler.ts"));
    assert!(text.contains("import { Merge } from \"./merge\";"));
    assert!(text.contains("    Merge.assign(ts, tsCompiler);\r\n"));

    let (top, namespace) = split_at_namespace(&text);
    assert!(top.contains("export declare enum EmitFlags {"));
    assert!(namespace.contains("    export declare enum SyntaxKind {"));
    assert_eq!(text.matches("_brand: undefined;").count(), 1);
}

#[test]
fn test_explicit_config_overrides() {
    let dir = scratch_project(COMPILER_DTS);
    let config = Config {
        output: PathBuf::from("out.ts"),
        ..Config::default()
    };
    let project = Project::with_config(dir.path(), config).unwrap();
    let written = project.regenerate().unwrap();
    assert_eq!(written, dir.path().join("out.ts"));
}
