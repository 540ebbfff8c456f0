//! AST types for TypeScript declaration files.

use std::fmt;

/// A parsed .d.ts file containing multiple declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DtsFile {
    pub items: Vec<DtsItem>,
}

/// A declaration in a .d.ts file or inside a namespace body.
#[derive(Debug, Clone, PartialEq)]
pub enum DtsItem {
    Function(DtsFunction),
    Interface(DtsInterface),
    TypeAlias(DtsTypeAlias),
    Class(DtsClass),
    Enum(DtsEnum),
    Variable(DtsVariableStatement),
    Namespace(DtsNamespace),
    Module(DtsModule),
    Export(DtsExport),
}

/// The seven declaration kinds that can be cloned between containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Namespace,
    Interface,
    Enum,
    TypeAlias,
    Class,
    Function,
    VariableStatement,
}

impl DeclarationKind {
    /// Kinds in the order a namespace body is cloned.
    pub const CLONE_ORDER: [DeclarationKind; 7] = [
        DeclarationKind::Namespace,
        DeclarationKind::Interface,
        DeclarationKind::Enum,
        DeclarationKind::TypeAlias,
        DeclarationKind::Class,
        DeclarationKind::Function,
        DeclarationKind::VariableStatement,
    ];
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclarationKind::Namespace => "namespace",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Enum => "enum",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::Class => "class",
            DeclarationKind::Function => "function",
            DeclarationKind::VariableStatement => "variable statement",
        };
        f.write_str(name)
    }
}

impl DtsItem {
    /// The cloneable kind of this item, if it is one.
    pub fn kind(&self) -> Option<DeclarationKind> {
        match self {
            DtsItem::Function(_) => Some(DeclarationKind::Function),
            DtsItem::Interface(_) => Some(DeclarationKind::Interface),
            DtsItem::TypeAlias(_) => Some(DeclarationKind::TypeAlias),
            DtsItem::Class(_) => Some(DeclarationKind::Class),
            DtsItem::Enum(_) => Some(DeclarationKind::Enum),
            DtsItem::Variable(_) => Some(DeclarationKind::VariableStatement),
            DtsItem::Namespace(_) => Some(DeclarationKind::Namespace),
            DtsItem::Module(_) | DtsItem::Export(_) => None,
        }
    }

    /// The declared name. Variable statements report their first declarator.
    pub fn name(&self) -> Option<&str> {
        match self {
            DtsItem::Function(f) => Some(&f.name),
            DtsItem::Interface(i) => Some(&i.name),
            DtsItem::TypeAlias(t) => Some(&t.name),
            DtsItem::Class(c) => Some(&c.name),
            DtsItem::Enum(e) => Some(&e.name),
            DtsItem::Variable(v) => v.declarations.first().map(|d| d.name.as_str()),
            DtsItem::Namespace(ns) => Some(&ns.name),
            DtsItem::Module(m) => Some(&m.name),
            DtsItem::Export(_) => None,
        }
    }
}

/// A function declaration: `declare function name<T>(params): ReturnType;`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsFunction {
    pub name: String,
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    /// Explicit `this` parameter type annotation (e.g., `function foo(this: Window, ...): void`)
    pub this_param: Option<Box<DtsType>>,
}

/// An interface declaration: `interface Name<T> extends Base { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsInterface {
    pub name: String,
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<DtsType>,
    pub members: Vec<InterfaceMember>,
}

impl DtsInterface {
    /// The first index signature among the members, if any.
    pub fn first_index_signature_mut(&mut self) -> Option<&mut IndexSignature> {
        self.members.iter_mut().find_map(|m| match m {
            InterfaceMember::IndexSignature(sig) => Some(sig),
            _ => None,
        })
    }
}

/// A type alias: `type Name<T> = Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsTypeAlias {
    pub name: String,
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub ty: DtsType,
}

/// A class declaration: `declare class Name<T> extends Base implements Interface { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsClass {
    pub name: String,
    pub doc: Option<String>,
    pub is_abstract: bool,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<DtsType>,
    pub implements: Vec<DtsType>,
    pub members: Vec<ClassMember>,
}

/// An enum declaration: `declare const enum Name { A = 1, B }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsEnum {
    pub name: String,
    pub doc: Option<String>,
    pub is_const: bool,
    pub members: Vec<EnumMember>,
}

/// A single enum member. The initializer is kept as written.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub doc: Option<String>,
    pub initializer: Option<String>,
}

/// `const`, `let` or `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Const,
    Let,
    Var,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Const => write!(f, "const"),
            VariableKind::Let => write!(f, "let"),
            VariableKind::Var => write!(f, "var"),
        }
    }
}

/// A variable statement: `declare const a: A, b: B;`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsVariableStatement {
    pub doc: Option<String>,
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
}

/// One declarator of a variable statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: String,
    pub ty: Option<DtsType>,
    /// Literal initializer kept as written (`const version = "5.4";`).
    pub initializer: Option<String>,
}

/// A namespace declaration: `declare namespace Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsNamespace {
    pub name: String,
    pub doc: Option<String>,
    pub items: Vec<DtsItem>,
}

impl DtsNamespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            items: Vec::new(),
        }
    }
}

/// A module declaration: `declare module "name" { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct DtsModule {
    pub name: String,
    pub items: Vec<DtsItem>,
    /// Whether this is an ambient module (string literal name like `declare module "express"`)
    /// vs a regular module declaration. Ambient modules augment existing packages.
    pub is_ambient: bool,
}

/// An export statement
#[derive(Debug, Clone, PartialEq)]
pub enum DtsExport {
    /// `export = name;`
    Equals(String),
    /// `export default name;`
    Default(String),
    /// `export { name, name2 as alias };`
    Named(Vec<(String, Option<String>)>),
}

/// A generic type parameter with optional constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    /// `in`, `out` and `const` modifiers, in source order.
    pub modifiers: Vec<TypeParamModifier>,
    /// Optional constraint: `T extends Foo`
    pub constraint: Option<DtsType>,
    /// Optional default: `T = DefaultType`
    pub default: Option<DtsType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeParamModifier {
    In,
    Out,
    Const,
}

/// A function/method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<DtsType>,
    pub optional: bool,
    pub rest: bool,
}

/// A member of an interface or of an object literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceMember {
    Property(PropertyMember),
    Method(MethodMember),
    CallSignature(CallSignature),
    ConstructSignature(ConstructSignature),
    IndexSignature(IndexSignature),
    Accessor(Accessor),
}

/// A property in an interface: `name?: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMember {
    pub name: String,
    pub doc: Option<String>,
    pub ty: Option<DtsType>,
    pub optional: bool,
    pub readonly: bool,
}

/// A method in an interface: `name<T>(params): ReturnType;`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMember {
    pub name: String,
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    pub optional: bool,
    /// If this method has an explicit `this` parameter type
    pub this_param: Option<Box<DtsType>>,
}

/// A call signature: `(params): ReturnType;`
#[derive(Debug, Clone, PartialEq)]
pub struct CallSignature {
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    /// If this call signature has an explicit `this` parameter type
    pub this_param: Option<Box<DtsType>>,
}

/// A construct signature: `new (params): ReturnType;`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructSignature {
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
}

/// An index signature: `[key: string]: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub doc: Option<String>,
    pub key_name: String,
    pub key_type: DtsType,
    pub value_type: DtsType,
    pub readonly: bool,
    pub is_static: bool,
}

/// `get name(): T;` or `set name(value: T);`
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub name: String,
    pub doc: Option<String>,
    pub kind: AccessorKind,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

/// A member of a class.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Property(ClassProperty),
    Method(ClassMethod),
    Constructor(ClassConstructor),
    IndexSignature(IndexSignature),
    Accessor(Accessor),
}

/// A class constructor: `protected constructor(params);`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassConstructor {
    pub doc: Option<String>,
    pub visibility: Visibility,
    pub params: Vec<Param>,
}

/// A property in a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProperty {
    pub name: String,
    pub doc: Option<String>,
    pub ty: Option<DtsType>,
    pub optional: bool,
    pub readonly: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
}

/// A method in a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMethod {
    pub name: String,
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<DtsType>,
    pub optional: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
    /// If this method has an explicit `this` parameter type
    pub this_param: Option<Box<DtsType>>,
}

/// Visibility modifier for class members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A TypeScript type.
#[derive(Debug, Clone, PartialEq)]
pub enum DtsType {
    /// A named type with optional type arguments: `Promise<T>`, `ts.Node`
    Named {
        name: String,
        type_args: Vec<DtsType>,
    },
    /// A primitive type: `string`, `number`, `boolean`, `void`, etc.
    Primitive(Primitive),
    /// A string literal type: `"GET"`, `"POST"`
    StringLiteral(String),
    /// A number literal type: `1`, `-1`
    NumberLiteral(String),
    /// A boolean literal type: `true`, `false`
    BooleanLiteral(bool),
    /// A union type: `A | B | C`
    Union(Vec<DtsType>),
    /// An intersection type: `A & B & C`
    Intersection(Vec<DtsType>),
    /// A function type: `(a: T, b: U) => R`
    Function(Box<FunctionType>),
    /// A constructor type: `new (a: T) => R`
    Constructor {
        is_abstract: bool,
        func: Box<FunctionType>,
    },
    /// An object literal type: `{ key: Type, key2?: Type2 }`
    Object(Vec<InterfaceMember>),
    /// An array type: `T[]`
    Array(Box<DtsType>),
    /// A tuple type: `[T, U, V]`
    Tuple(Vec<TupleElement>),
    /// A typeof type: `typeof foo.bar`
    TypeOf(String),
    /// A keyof type: `keyof T`
    KeyOf(Box<DtsType>),
    /// `readonly T[]` or `unique symbol`
    Operator {
        op: TypeOperator,
        ty: Box<DtsType>,
    },
    /// An indexed access type: `T[K]`
    IndexAccess {
        object: Box<DtsType>,
        index: Box<DtsType>,
    },
    /// A conditional type: `T extends U ? X : Y`
    Conditional {
        check: Box<DtsType>,
        extends: Box<DtsType>,
        true_type: Box<DtsType>,
        false_type: Box<DtsType>,
    },
    /// A mapped type: `{ [K in keyof T as N]: T[K] }`
    Mapped {
        key_name: String,
        key_constraint: Box<DtsType>,
        name_type: Option<Box<DtsType>>,
        value_type: Box<DtsType>,
        readonly: Option<MappedModifier>,
        optional: Option<MappedModifier>,
    },
    /// An infer type: `infer T`
    Infer(String),
    /// A template literal type, kept as written including backticks.
    TemplateLiteral(String),
    /// `import("module").Qualified.Name<T>`
    Import {
        module: String,
        qualifier: Option<String>,
        type_args: Vec<DtsType>,
    },
    /// A type predicate: `node is Identifier`, `asserts value`, `this is T`
    Predicate {
        asserts: bool,
        param: String,
        ty: Option<Box<DtsType>>,
    },
    /// A parenthesized type: `(T)`
    Parenthesized(Box<DtsType>),
    /// A this type: `this`
    This,
}

impl DtsType {
    pub fn named(name: impl Into<String>) -> Self {
        DtsType::Named {
            name: name.into(),
            type_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    Readonly,
    Unique,
}

/// A primitive TypeScript type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Void,
    Null,
    Undefined,
    Any,
    Unknown,
    Never,
    Object,
    Symbol,
    BigInt,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::String => write!(f, "string"),
            Primitive::Number => write!(f, "number"),
            Primitive::Boolean => write!(f, "boolean"),
            Primitive::Void => write!(f, "void"),
            Primitive::Null => write!(f, "null"),
            Primitive::Undefined => write!(f, "undefined"),
            Primitive::Any => write!(f, "any"),
            Primitive::Unknown => write!(f, "unknown"),
            Primitive::Never => write!(f, "never"),
            Primitive::Object => write!(f, "object"),
            Primitive::Symbol => write!(f, "symbol"),
            Primitive::BigInt => write!(f, "bigint"),
        }
    }
}

/// A function type: `(params) => ReturnType`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Box<DtsType>,
    /// If this function has a `this` parameter
    pub this_param: Option<Box<DtsType>>,
}

/// An element in a tuple type.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub ty: DtsType,
    pub name: Option<String>,
    pub optional: bool,
    pub rest: bool,
}

/// A modifier in a mapped type: `+`, `-`, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedModifier {
    Add,
    Remove,
    Preserve,
}
