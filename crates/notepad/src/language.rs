//! Known languages and classification of opened files.

use serde_json::json;

use crate::document::PLAINTEXT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: &'static str,
    pub aliases: &'static [&'static str],
    pub extensions: &'static [&'static str],
    pub mimetypes: &'static [&'static str],
}

const fn lang(
    id: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
    mimetypes: &'static [&'static str],
) -> Language {
    Language {
        id,
        aliases,
        extensions,
        mimetypes,
    }
}

/// The editor component's language contributions, in lookup order.
const BUILTIN: &[Language] = &[
    lang(
        "plaintext",
        &["Plain Text", "text"],
        &[".txt"],
        &["text/plain"],
    ),
    lang("abap", &["abap", "ABAP"], &[".abap"], &[]),
    lang(
        "apex",
        &["Apex", "apex"],
        &[".cls"],
        &["text/x-apex-source", "text/x-apex"],
    ),
    lang("azcli", &["Azure CLI", "azcli"], &[".azcli"], &[]),
    lang("bat", &["Batch", "bat"], &[".bat", ".cmd"], &[]),
    lang("bicep", &["Bicep"], &[".bicep"], &[]),
    lang("cameligo", &["Cameligo"], &[".mligo"], &[]),
    lang(
        "clojure",
        &["clojure", "Clojure"],
        &[".clj", ".cljs", ".cljc", ".edn"],
        &[],
    ),
    lang(
        "coffeescript",
        &["CoffeeScript", "coffeescript", "coffee"],
        &[".coffee"],
        &["text/x-coffeescript", "text/coffeescript"],
    ),
    lang("c", &["C", "c"], &[".c", ".h"], &[]),
    lang(
        "cpp",
        &["C++", "Cpp", "cpp"],
        &[".cpp", ".cc", ".cxx", ".hpp", ".hh", ".hxx"],
        &[],
    ),
    lang("csharp", &["C#", "csharp"], &[".cs", ".csx", ".cake"], &[]),
    lang("css", &["CSS", "css"], &[".css"], &["text/css"]),
    lang(
        "cypher",
        &["Cypher", "OpenCypher"],
        &[".cypher", ".cyp"],
        &[],
    ),
    lang(
        "dart",
        &["Dart", "dart"],
        &[".dart"],
        &["text/x-dart-source", "text/x-dart"],
    ),
    lang("dockerfile", &["Dockerfile"], &[".dockerfile"], &[]),
    lang("ecl", &["ECL", "Ecl", "ecl"], &[".ecl"], &[]),
    lang("elixir", &["Elixir", "elixir", "ex"], &[".ex", ".exs"], &[]),
    lang(
        "flow9",
        &["Flow9", "Flow", "flow9", "flow"],
        &[".flow"],
        &[],
    ),
    lang(
        "fsharp",
        &["F#", "FSharp", "fsharp"],
        &[".fs", ".fsi", ".ml", ".mli", ".fsx", ".fsscript"],
        &[],
    ),
    lang(
        "freemarker2",
        &["FreeMarker2", "Apache FreeMarker2"],
        &[".ftl", ".ftlh", ".ftlx"],
        &[],
    ),
    lang("go", &["Go"], &[".go"], &[]),
    lang(
        "graphql",
        &["GraphQL", "graphql", "gql"],
        &[".graphql", ".gql"],
        &["application/graphql"],
    ),
    lang(
        "handlebars",
        &["Handlebars", "handlebars", "hbs"],
        &[".handlebars", ".hbs"],
        &["text/x-handlebars-template"],
    ),
    lang(
        "hcl",
        &["Terraform", "tf", "HCL", "hcl"],
        &[".tf", ".tfvars", ".hcl"],
        &[],
    ),
    lang(
        "html",
        &["HTML", "htm", "html", "xhtml"],
        &[".html", ".htm", ".shtml", ".xhtml", ".mdoc", ".jsp", ".asp", ".aspx", ".jshtm"],
        &["text/html", "text/x-jshtm", "text/template", "text/ng-template"],
    ),
    lang(
        "ini",
        &["Ini", "ini"],
        &[".ini", ".properties", ".gitconfig"],
        &[],
    ),
    lang(
        "java",
        &["Java", "java"],
        &[".java", ".jav"],
        &["text/x-java-source", "text/x-java"],
    ),
    lang(
        "javascript",
        &["JavaScript", "javascript", "js"],
        &[".js", ".es6", ".jsx", ".mjs", ".cjs"],
        &["text/javascript"],
    ),
    lang("julia", &["julia", "Julia"], &[".jl"], &[]),
    lang(
        "kotlin",
        &["Kotlin", "kotlin"],
        &[".kt", ".kts"],
        &["text/x-kotlin-source", "text/x-kotlin"],
    ),
    lang(
        "less",
        &["Less", "less"],
        &[".less"],
        &["text/x-less", "text/less"],
    ),
    lang("lexon", &["Lexon"], &[".lex"], &[]),
    lang("lua", &["Lua", "lua"], &[".lua"], &[]),
    lang(
        "liquid",
        &["Liquid", "liquid"],
        &[".liquid", ".html.liquid"],
        &["application/liquid"],
    ),
    lang(
        "m3",
        &["Modula-3", "Modula3", "modula3", "m3"],
        &[".m3", ".i3", ".mg", ".ig"],
        &[],
    ),
    lang(
        "markdown",
        &["Markdown", "markdown"],
        &[".md", ".markdown", ".mdown", ".mkdn", ".mkd", ".mdwn", ".mdtxt", ".mdtext"],
        &[],
    ),
    lang("mdx", &["MDX", "mdx"], &[".mdx"], &[]),
    lang("mips", &["MIPS", "MIPS-V"], &[".s"], &[]),
    lang("msdax", &["DAX", "MSDAX"], &[".dax", ".msdax"], &[]),
    lang("objective-c", &["Objective-C"], &[".m"], &[]),
    lang("pascal", &["Pascal", "pas"], &[".pas", ".p", ".pp"], &[]),
    lang("pascaligo", &["Pascaligo", "ligo"], &[".ligo"], &[]),
    lang("perl", &["Perl", "pl"], &[".pl", ".pm"], &[]),
    lang(
        "php",
        &["PHP", "php"],
        &[".php", ".php4", ".php5", ".phtml", ".ctp"],
        &["application/x-php"],
    ),
    lang("pla", &[], &[".pla"], &[]),
    lang(
        "postiats",
        &["ATS", "ATS/Postiats"],
        &[".dats", ".sats", ".hats"],
        &[],
    ),
    lang(
        "powerquery",
        &["PQ", "M", "Power Query"],
        &[".pq", ".pqm"],
        &[],
    ),
    lang(
        "powershell",
        &["PowerShell", "powershell", "ps", "ps1"],
        &[".ps1", ".psm1", ".psd1"],
        &[],
    ),
    lang("proto", &["protobuf", "Protocol Buffers"], &[".proto"], &[]),
    lang("pug", &["Pug", "Jade", "jade"], &[".jade", ".pug"], &[]),
    lang(
        "python",
        &["Python", "py"],
        &[".py", ".rpy", ".pyw", ".cpy", ".gyp", ".gypi"],
        &[],
    ),
    lang("qsharp", &["Q#", "qsharp"], &[".qs"], &[]),
    lang(
        "r",
        &["R", "r"],
        &[".r", ".rhistory", ".rmd", ".rprofile", ".rt"],
        &[],
    ),
    lang(
        "razor",
        &["Razor", "razor"],
        &[".cshtml"],
        &["text/x-cshtml"],
    ),
    lang("redis", &["redis"], &[".redis"], &[]),
    lang(
        "restructuredtext",
        &["reStructuredText", "restructuredtext"],
        &[".rst"],
        &[],
    ),
    lang(
        "ruby",
        &["Ruby", "rb"],
        &[".rb", ".rbx", ".rjs", ".gemspec", ".pp"],
        &[],
    ),
    lang("rust", &["Rust", "rust"], &[".rs", ".rlib"], &[]),
    lang("sb", &["Small Basic", "sb"], &[".sb"], &[]),
    lang(
        "scala",
        &["Scala", "scala", "SBT", "Sbt", "sbt", "Dotty", "dotty"],
        &[".scala", ".sc", ".sbt"],
        &["text/x-scala-source", "text/x-scala", "text/x-sbt", "text/x-lift"],
    ),
    lang(
        "scheme",
        &["scheme", "Scheme"],
        &[".scm", ".ss", ".sch", ".rkt"],
        &[],
    ),
    lang(
        "scss",
        &["Sass", "sass", "scss"],
        &[".scss"],
        &["text/x-scss", "text/scss"],
    ),
    lang("shell", &["Shell", "sh"], &[".sh", ".bash"], &[]),
    lang("sol", &["sol", "solidity", "Solidity"], &[".sol"], &[]),
    lang("aes", &["aes", "sophia", "Sophia"], &[".aes"], &[]),
    lang(
        "sparql",
        &["sparql", "SPARQL"],
        &[".rq"],
        &["application/sparql-query"],
    ),
    lang("sql", &["SQL"], &[".sql"], &[]),
    lang(
        "st",
        &["StructuredText", "scl", "stl"],
        &[".st", ".iecst", ".iecplc", ".lc3lib", ".TcPOU", ".TcDUT", ".TcGVL", ".TcIO"],
        &[],
    ),
    lang("swift", &["Swift", "swift"], &[".swift"], &["text/swift"]),
    lang(
        "systemverilog",
        &["SV", "sv", "SystemVerilog", "systemverilog"],
        &[".sv", ".svh"],
        &[],
    ),
    lang(
        "verilog",
        &["V", "v", "Verilog", "verilog"],
        &[".v", ".vh"],
        &[],
    ),
    lang(
        "tcl",
        &["tcl", "Tcl", "tcltk", "TclTk", "tcl/tk", "Tcl/Tk"],
        &[".tcl"],
        &[],
    ),
    lang("twig", &["Twig", "twig"], &[".twig"], &["text/x-twig"]),
    lang(
        "typescript",
        &["TypeScript", "ts", "typescript"],
        &[".ts", ".tsx", ".cts", ".mts"],
        &["text/typescript"],
    ),
    lang("vb", &["Visual Basic", "vb"], &[".vb", ".vba"], &[]),
    lang(
        "wgsl",
        &["WebGPU Shading Language", "WGSL", "wgsl"],
        &[".wgsl"],
        &[],
    ),
    lang(
        "xml",
        &["XML", "xml"],
        &[
            ".xml", ".xsd", ".dtd", ".ascx", ".csproj", ".config", ".props", ".targets", ".wxi",
            ".wxl", ".wxs", ".xaml", ".svg", ".svgz", ".opf", ".xslt", ".xsl",
        ],
        &["text/xml", "application/xml", "application/xaml+xml", "application/xml-dtd"],
    ),
    lang(
        "yaml",
        &["YAML", "yaml", "YML", "yml"],
        &[".yaml", ".yml"],
        &["application/x-yaml", "text/x-yaml"],
    ),
    lang(
        "json",
        &["JSON", "json"],
        &[".json", ".bowerrc", ".jshintrc", ".jscsrc", ".eslintrc", ".babelrc", ".har"],
        &["application/json"],
    ),
];

#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    pub fn builtin() -> Self {
        Self {
            languages: BUILTIN.to_vec(),
        }
    }

    pub fn from_languages(languages: Vec<Language>) -> Self {
        Self { languages }
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn get(&self, id: &str) -> Option<&Language> {
        self.languages.iter().find(|lang| lang.id == id)
    }

    /// Resolve the language of a file: declared MIME type first, then the
    /// extension, then `plaintext`.
    pub fn classify(&self, mime_type: Option<&str>, file_name: &str) -> &str {
        if let Some(mime) = mime_type.map(str::trim).filter(|m| !m.is_empty()) {
            let by_mime = self
                .languages
                .iter()
                .find(|l| l.mimetypes.iter().any(|m| *m == mime));
            if let Some(lang) = by_mime {
                return lang.id;
            }
        }

        let extension = format!(".{}", file_extension(file_name));
        let by_extension = self
            .languages
            .iter()
            .find(|l| l.extensions.iter().any(|ext| *ext == extension))
            .or_else(|| {
                self.languages.iter().find(|l| {
                    l.extensions
                        .iter()
                        .any(|ext| ext.eq_ignore_ascii_case(&extension))
                })
            });

        by_extension.map_or(PLAINTEXT, |lang| lang.id)
    }

    /// Human-readable name for the status bar: first alias, else the id.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id)
            .and_then(|lang| lang.aliases.first().copied())
            .unwrap_or(id)
    }

    /// Every extension the app registers for "open with", without duplicates.
    pub fn accepted_extensions(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for ext in self.languages.iter().flat_map(|lang| lang.extensions.iter()) {
            if !seen.contains(ext) {
                seen.push(*ext);
            }
        }
        seen
    }

    /// `file_handlers` entry of the web app manifest.
    pub fn file_handler_manifest(&self) -> serde_json::Value {
        json!({
            "file_handlers": [{
                "action": "/",
                "accept": {
                    "text/*": self.accepted_extensions(),
                },
            }],
        })
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Text after the last `.` of a file name, or empty when there is none.
pub fn file_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or("", |(_, extension)| extension)
}
