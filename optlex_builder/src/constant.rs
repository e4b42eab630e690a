pub(crate) const LINUX_KEY_PREFIXES: [&str; 2] = ["-", "--"];
pub(crate) const WINDOWS_KEY_PREFIXES: [&str; 1] = ["/"];
pub(crate) const UNIVERSAL_KEY_PREFIXES: [&str; 3] = ["-", "--", "/"];
pub(crate) const VALUE_PREFIXES: [&str; 1] = ["="];
pub(crate) const QUOTERS: [&str; 2] = ["\"", "'"];
pub(crate) const SEPARATORS: [&str; 2] = [" ", "\t"];

// Joins the arguments of an already split argument list.
pub(crate) const ARGUMENT_SEPARATOR: &str = " ";

// Separates the member names of a flag enumeration inside one value (ex: `Read,Write`).
pub(crate) const FLAG_DELIMITER: char = ',';
