//! This module implements the data loader.
//!
//! Currently we support the csv input format: one sample per line, every
//! column a number, one column carrying the class label and the remaining
//! columns carrying the features in order.
//!
//! # Example
//! ```rust
//! use cart::input::InputFormat;
//! use cart::input;
//! let train_file = "dataset/iris/train.txt";
//! let mut fmt = InputFormat::csv_format();
//! fmt.set_label_index(4);
//! let train_data = input::load(train_file, fmt);
//! ```

use crate::decision_tree::{ClassLabel, Data, DataVec, ValueType};
use crate::errors::Result;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};

use regex::Regex;
use serde_derive::{Deserialize, Serialize};

/// The input file format struct.
#[derive(Copy, Debug, Clone, Serialize, Deserialize)]
pub struct InputFormat {
    /// Indicates whether the csv has header.
    pub header: bool,

    /// Indicates which colume is the data label. (default = 0)
    pub label_idx: usize,

    /// Delimeter of the data file.
    pub delimeter: char,
}

impl InputFormat {
    /// Return a default CSV input format.
    /// # Example
    /// ```rust
    /// use cart::input::InputFormat;
    /// let fmt = InputFormat::csv_format();
    /// println!("{}", fmt.to_string());
    /// ```
    pub fn csv_format() -> InputFormat {
        InputFormat {
            header: false,
            label_idx: 0,
            delimeter: ',',
        }
    }

    /// Set the label index.
    /// # Example
    /// ```rust
    /// use cart::input::InputFormat;
    /// let mut fmt = InputFormat::csv_format();
    /// fmt.set_label_index(34);
    /// ```
    pub fn set_label_index(&mut self, idx: usize) {
        self.label_idx = idx;
    }

    /// Set whether the first line is a header.
    /// # Example
    /// ```rust
    /// use cart::input::InputFormat;
    /// let mut fmt = InputFormat::csv_format();
    /// fmt.set_header(true);
    /// ```
    pub fn set_header(&mut self, header: bool) {
        self.header = header;
    }

    /// Set the delimeter.
    /// # Example
    /// ```rust
    /// use cart::input::InputFormat;
    /// let mut fmt = InputFormat::csv_format();
    /// fmt.set_delimeter(';');
    /// ```
    pub fn set_delimeter(&mut self, delim: char) {
        self.delimeter = delim;
    }

    /// Transform the input format to human readable string.
    /// # Example
    /// ```rust
    /// use cart::input::InputFormat;
    /// let fmt = InputFormat::csv_format();
    /// println!("{}", fmt.to_string());
    /// ```
    pub fn to_string(&self) -> String {
        let mut s = String::from("");
        s.push_str(&format!("Has header: {}\n", self.header));
        s.push_str(&format!("Label index: {}\n", self.label_idx));
        s.push_str(&format!("Delemeter: [{}]", self.delimeter));
        s
    }
}

/// Function for char counting, used in [infer](fn.infer.html)
fn count(mut hash_map: HashMap<char, u32>, word: char) -> HashMap<char, u32> {
    {
        let c = hash_map.entry(word).or_insert(0);
        *c += 1;
    }
    hash_map
}

/// Function used for input file format inference. The delimeter is guessed
/// from the second line after the numeric fields are removed; the header flag
/// is set when the first line still contains letters after the numeric fields
/// are removed.
///
/// # Example
/// ```rust
/// use cart::input::infer;
/// let train_file = "dataset/iris/train.txt";
/// let fmt = infer(train_file);
/// println!("{}", fmt.to_string());
/// ```
pub fn infer(file_name: &str) -> InputFormat {
    let file = File::open(file_name.to_string()).unwrap();
    let mut reader = BufReader::new(file);

    let mut input_format = InputFormat::csv_format();

    let mut first_line = String::new();
    reader.read_line(&mut first_line).unwrap();
    let mut second_line = String::new();
    reader
        .read_line(&mut second_line)
        .expect("No second line to read");

    // strip the numeric fields, what remains is delimeters and column names
    let reg = Regex::new(r"[+-]?\d+(\.\d+([eE][+-]?\d+)?)?").unwrap();
    let second_line_after = reg.replace_all(&second_line, "");
    let cnt = second_line_after.chars().fold(HashMap::new(), count);

    let mut max_cnt: u32 = 0;
    let mut delim = ',';
    for (k, v) in &cnt {
        if (*v > max_cnt) && !k.is_alphanumeric() && (*k != '\n') && (*k != '\r') {
            max_cnt = *v;
            delim = *k;
        }
    }
    if max_cnt > 0 {
        input_format.delimeter = delim;
    }

    let first_line_after = reg.replace_all(&first_line, "");
    let letters = Regex::new(r"[a-zA-Z]").unwrap();
    if letters.is_match(&first_line_after) {
        input_format.header = true;
    }

    input_format
}

/// Load the file with the given input format. Return a data vector.
///
/// # Example
/// ```rust
/// use cart::input::{load, InputFormat};
/// let train_file = "dataset/iris/train.txt";
/// let mut fmt = InputFormat::csv_format();
/// fmt.set_label_index(4);
/// let train_dv = load(train_file, fmt).unwrap();
/// assert_eq!(train_dv.len(), 30);
/// ```
///
/// # Error
/// Raise error if file cannot be open or parsed correctly.
pub fn load(file_name: &str, input_format: InputFormat) -> Result<DataVec> {
    let mut file = File::open(file_name.to_string())?;
    load_csv(&mut file, input_format)
}

/// Load csv file.
/// # Example
/// ```rust
/// use std::fs::File;
/// use cart::input::{load_csv, InputFormat};
/// let train_file = "dataset/iris/train.txt";
/// let mut file = File::open(train_file.to_string()).unwrap();
/// let mut fmt = InputFormat::csv_format();
/// fmt.set_label_index(4);
/// let train_dv = load_csv(&mut file, fmt).unwrap();
/// ```
///
/// # Error
/// Raise error if file cannot be read correctly.
pub fn load_csv(file: &mut File, input_format: InputFormat) -> Result<DataVec> {
    file.seek(SeekFrom::Start(0))?;
    let mut dv = Vec::new();

    let mut reader = BufReader::new(file);
    let mut l = String::new();
    if input_format.header {
        reader.read_line(&mut l).unwrap_or(0);
    }
    for line in reader.lines() {
        let content = line?;
        let mut feature: Vec<ValueType> = Vec::new();
        let mut label: ClassLabel = 0;
        for (idx, field) in content.split(input_format.delimeter).enumerate() {
            let v = field.trim().parse::<ValueType>()?;
            if idx == input_format.label_idx {
                label = v as ClassLabel;
            } else {
                feature.push(v);
            }
        }
        dv.push(Data::new_training_data(feature, label));
    }
    Ok(dv)
}
