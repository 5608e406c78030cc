use std::fmt;

/// Аргументы JVM для запуска клиента (всё после `java`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs(Vec<String>);

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, arg: impl Into<String>) {
        self.0.push(arg.into());
    }

    pub fn extend<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(args.into_iter().map(Into::into));
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First argument starting with `prefix`
    pub fn find_prefixed(&self, prefix: &str) -> Option<&str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|arg| arg.starts_with(prefix))
    }
}

impl From<Vec<String>> for CommandArgs {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl From<CommandArgs> for Vec<String> {
    fn from(args: CommandArgs) -> Self {
        args.0
    }
}

impl<'a> IntoIterator for &'a CommandArgs {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Копия аргументов без учётных данных прокси, только для логов
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedArgs(pub(crate) Vec<String>);

impl RedactedArgs {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for RedactedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}
