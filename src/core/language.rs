//! Language / content-type detection from file names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    // Programming languages
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    CSharp,
    Ruby,
    Php,
    Go,
    Rust,
    Swift,
    Kotlin,
    Scala,
    #[serde(rename = "objective-c")]
    ObjectiveC,
    // Web
    Html,
    Css,
    Scss,
    Less,
    Vue,
    Svelte,
    // Data & config
    Json,
    Xml,
    Yaml,
    Toml,
    Ini,
    Config,
    // Documentation
    Markdown,
    RestructuredText,
    Latex,
    // Shell
    Shell,
    Batch,
    PowerShell,
    // Other
    Sql,
    R,
    Gradle,
    Dockerfile,
    Makefile,
    Jenkinsfile,
    Env,
    Gitignore,
    Text,
}

impl Language {
    /// Detect the language of a file from its extension, falling back to
    /// well-known extensionless names. Unknown files are `Text`.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_extension(&ext.to_lowercase()).unwrap_or(Language::Text),
            None => path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| Self::from_file_name(&name.to_lowercase()))
                .unwrap_or(Language::Text),
        }
    }

    /// Lookup by lower-case extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let language = match ext {
            "py" => Language::Python,
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "java" => Language::Java,
            "cpp" | "cc" | "hpp" => Language::Cpp,
            "c" | "h" => Language::C,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "swift" => Language::Swift,
            "kt" => Language::Kotlin,
            "scala" => Language::Scala,
            "m" | "mm" => Language::ObjectiveC,
            "html" | "htm" => Language::Html,
            "css" => Language::Css,
            "scss" | "sass" => Language::Scss,
            "less" => Language::Less,
            "vue" => Language::Vue,
            "svelte" => Language::Svelte,
            "json" => Language::Json,
            "xml" => Language::Xml,
            "yaml" | "yml" => Language::Yaml,
            "toml" => Language::Toml,
            "ini" => Language::Ini,
            "conf" => Language::Config,
            "md" | "markdown" => Language::Markdown,
            "rst" => Language::RestructuredText,
            "tex" => Language::Latex,
            "sh" | "bash" | "zsh" | "fish" => Language::Shell,
            "bat" | "cmd" => Language::Batch,
            "ps1" => Language::PowerShell,
            "sql" => Language::Sql,
            "r" => Language::R,
            "gradle" => Language::Gradle,
            "dockerfile" => Language::Dockerfile,
            "env" => Language::Env,
            "gitignore" => Language::Gitignore,
            _ => return None,
        };
        Some(language)
    }

    /// Lookup by lower-case file name, for files without an extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let language = match name {
            "dockerfile" => Language::Dockerfile,
            "makefile" => Language::Makefile,
            "jenkinsfile" => Language::Jenkinsfile,
            "vagrantfile" => Language::Ruby,
            ".env" => Language::Env,
            ".gitignore" => Language::Gitignore,
            _ => return None,
        };
        Some(language)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::ObjectiveC => "objective-c",
            Language::Html => "html",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Less => "less",
            Language::Vue => "vue",
            Language::Svelte => "svelte",
            Language::Json => "json",
            Language::Xml => "xml",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Ini => "ini",
            Language::Config => "config",
            Language::Markdown => "markdown",
            Language::RestructuredText => "restructuredtext",
            Language::Latex => "latex",
            Language::Shell => "shell",
            Language::Batch => "batch",
            Language::PowerShell => "powershell",
            Language::Sql => "sql",
            Language::R => "r",
            Language::Gradle => "gradle",
            Language::Dockerfile => "dockerfile",
            Language::Makefile => "makefile",
            Language::Jenkinsfile => "jenkinsfile",
            Language::Env => "env",
            Language::Gitignore => "gitignore",
            Language::Text => "text",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
