//! Test utilities for csvrecord-core

#[cfg(test)]
pub mod test {
    use std::path::{Path, PathBuf};

    crate::csv_record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct Address {
            #[index] pub id: i32,
            #[index] pub name: String,
            pub email: String,
            pub height: f32,
            pub keys: Vec<i32>,
            pub kks: Vec<Vec<i32>>,
        }
    }

    /// Three address rows, tab separated, with a leading comment line
    pub fn address_rows() -> String {
        [
            "# address book",
            "int\tstring\tstring\tfloat\tarray1\tarray2",
            "id\tname\temail\theight\tkeys\tkks",
            "1001\tJohn Doe\tjohn@example.com\t1.75\t1,2,3\t1,2|3,4",
            "1002\ttest1\ttest1@example.com\t1.6\t4\t5|6,7",
            "1003\ttest2\ttest2@example.com\t1.8\t\t",
        ]
        .join("\n")
    }

    /// Write `contents` to `dir/name` and return the path
    pub fn write_table(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}
