mod enumeration;
