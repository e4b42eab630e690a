mod attribute;
mod enumeration;
