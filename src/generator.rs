//! Pseudo random test data in the input formats the report reads.

use std::{
    collections::HashSet,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    FIELD_SEPARATOR,
    config::Layout,
    error::PipelineError,
    model::{Product, ProductId, Salesperson},
    money::Money,
    scanner::SALES_FILE_EXTENSION,
};

const FIRST_NAMES: [&str; 10] = [
    "Camila", "Juan", "Valentina", "Andres", "Luisa", "Mateo", "Sofia", "Daniel", "Mariana",
    "Nicolas",
];
const LAST_NAMES: [&str; 10] = [
    "Garcia", "Rodriguez", "Martinez", "Lopez", "Hernandez", "Gomez", "Diaz", "Ramirez", "Torres",
    "Castro",
];
const DOCUMENT_TYPES: [&str; 3] = ["CC", "CE", "TI"];
const PRODUCT_NAMES: [&str; 10] = [
    "Keyboard", "Mouse", "Monitor", "Laptop", "Headphones", "Printer", "Webcam", "Microphone",
    "Router", "SSD",
];

/// Whole unit prices are drawn from this range
const PRICE_RANGE: std::ops::RangeInclusive<i64> = 20_000..=2_000_000;
const QUANTITY_RANGE: std::ops::RangeInclusive<u32> = 1..=10;
const DOCUMENT_DIGITS: std::ops::RangeInclusive<usize> = 8..=10;

pub const DEFAULT_SEED: u64 = 20_250_307;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub products: usize,
    pub salespeople: usize,
    /// sales per salesperson are drawn from this range
    pub sales_per_salesperson: std::ops::RangeInclusive<usize>,
    pub seed: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            products: 20,
            salespeople: 8,
            sales_per_salesperson: 10..=25,
            seed: DEFAULT_SEED,
        }
    }
}

/// What a generation run wrote
#[derive(Debug, Clone)]
pub struct Dataset {
    pub products: Vec<Product>,
    pub salespeople: Vec<Salesperson>,
    pub sales_files: Vec<PathBuf>,
}

type OutputWriter = csv::Writer<BufWriter<File>>;

fn create_output_writer(path: &Path) -> Result<OutputWriter, PipelineError> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(csv::WriterBuilder::new()
        .delimiter(FIELD_SEPARATOR as u8)
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(BufWriter::new(file)))
}

fn write_record(writer: &mut OutputWriter, path: &Path, record: &[&str]) -> Result<(), PipelineError> {
    writer
        .write_record(record)
        .map_err(|e| PipelineError::csv(path, e))
}

fn finish(mut writer: OutputWriter, path: &Path) -> Result<(), PipelineError> {
    writer.flush().map_err(|e| PipelineError::io(path, e))
}

/// Seeded generator; the same seed writes the same files
pub struct Generator {
    rng: StdRng,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<'a>(&mut self, pool: &[&'a str]) -> &'a str {
        pool[self.rng.gen_range(0..pool.len())]
    }

    /// Write `count` products as `ID;Name;Price` and return them
    pub fn create_products_file(&mut self, path: &Path, count: usize) -> Result<Vec<Product>, PipelineError> {
        if count == 0 {
            return Err(PipelineError::InvalidArgument(
                "product count must be at least 1".to_string(),
            ));
        }

        let mut writer = create_output_writer(path)?;
        let mut products = Vec::with_capacity(count);
        for i in 1..=count {
            let name = format!("{} {}", self.pick(&PRODUCT_NAMES), i);
            let price = Money::new(Decimal::from(self.rng.gen_range(PRICE_RANGE)))
                .map_err(|e| PipelineError::InvalidArgument(e.to_string()))?;
            let product = Product::new(ProductId::new(format!("P{i:04}")), name, price);

            let price = product.unit_price().to_string();
            write_record(&mut writer, path, &[product.id().as_str(), product.name(), price.as_str()])?;
            products.push(product);
        }
        finish(writer, path)?;
        Ok(products)
    }

    /// Write `count` salespeople as `DocType;DocNumber;FirstNames;LastNames` and
    /// return them. Document numbers are unique within the file.
    pub fn create_salespeople_file(
        &mut self,
        path: &Path,
        count: usize,
    ) -> Result<Vec<Salesperson>, PipelineError> {
        if count == 0 {
            return Err(PipelineError::InvalidArgument(
                "salesperson count must be at least 1".to_string(),
            ));
        }

        let mut writer = create_output_writer(path)?;
        let mut used = HashSet::new();
        let mut people = Vec::with_capacity(count);
        for _ in 0..count {
            let document_type = self.pick(&DOCUMENT_TYPES);
            let document_number = self.document_number(&mut used);
            let first_names = self.pick(&FIRST_NAMES);
            let last_names = self.pick(&LAST_NAMES);

            write_record(
                &mut writer,
                path,
                &[document_type, document_number.as_str(), first_names, last_names],
            )?;
            people.push(Salesperson::new(
                document_type,
                document_number,
                first_names,
                last_names,
            ));
        }
        finish(writer, path)?;
        Ok(people)
    }

    fn document_number(&mut self, used: &mut HashSet<String>) -> String {
        loop {
            let digits = self.rng.gen_range(DOCUMENT_DIGITS);
            let number: String = (0..digits)
                .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
                .collect();
            if used.insert(number.clone()) {
                return number;
            }
        }
    }

    /// Write `<DocType>_<DocNumber>.csv` into `dir` with the salesperson header
    /// and `count` random sales from `catalog`. An empty catalog gives a header
    /// only file.
    pub fn create_sales_file(
        &mut self,
        dir: &Path,
        salesperson: &Salesperson,
        catalog: &[Product],
        count: usize,
    ) -> Result<PathBuf, PipelineError> {
        let path = dir.join(format!(
            "{}_{}.{}",
            salesperson.document_type(),
            salesperson.document_number(),
            SALES_FILE_EXTENSION
        ));

        let mut writer = create_output_writer(&path)?;
        write_record(
            &mut writer,
            &path,
            &[salesperson.document_type(), salesperson.document_number()],
        )?;
        if !catalog.is_empty() {
            for _ in 0..count {
                let product = &catalog[self.rng.gen_range(0..catalog.len())];
                let quantity = self.rng.gen_range(QUANTITY_RANGE).to_string();
                // trailing empty field gives the `ID;Qty;` form
                write_record(&mut writer, &path, &[product.id().as_str(), quantity.as_str(), ""])?;
            }
        }
        finish(writer, &path)?;
        Ok(path)
    }

    /// Create the directories of `layout` and fill them with a full dataset
    pub fn generate_dataset(
        &mut self,
        layout: &Layout,
        options: &GenerateOptions,
    ) -> Result<Dataset, PipelineError> {
        if options.sales_per_salesperson.is_empty() {
            return Err(PipelineError::InvalidArgument(
                "sales per salesperson range is empty".to_string(),
            ));
        }
        std::fs::create_dir_all(&layout.sales_dir)
            .map_err(|e| PipelineError::io(&layout.sales_dir, e))?;

        let products = self.create_products_file(&layout.products, options.products)?;
        let salespeople = self.create_salespeople_file(&layout.salespeople, options.salespeople)?;

        let mut sales_files = Vec::with_capacity(salespeople.len());
        for salesperson in &salespeople {
            let count = self.rng.gen_range(options.sales_per_salesperson.clone());
            sales_files.push(self.create_sales_file(&layout.sales_dir, salesperson, &products, count)?);
        }

        info!(
            dir = %layout.base_dir.display(),
            products = products.len(),
            salespeople = salespeople.len(),
            "dataset generated"
        );
        Ok(Dataset {
            products,
            salespeople,
            sales_files,
        })
    }
}

/// Generate a dataset with a fresh generator seeded from `options`
pub fn generate_dataset(layout: &Layout, options: &GenerateOptions) -> Result<Dataset, PipelineError> {
    Generator::new(options.seed).generate_dataset(layout, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog, input::input_lines, input::InputLine};

    fn lines(path: &Path) -> Vec<Vec<String>> {
        let text = std::fs::read_to_string(path).unwrap();
        input_lines(text.as_bytes())
            .map(|l| match l.unwrap() {
                InputLine::Record { fields, .. } => fields,
                other => panic!("unexpected {:?}", other),
            })
            .collect()
    }

    #[test]
    fn products_file_matches_the_catalog_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let products = Generator::new(1).create_products_file(&path, 5).unwrap();

        assert_eq!(5, products.len());
        assert_eq!("P0001", products[0].id().as_str());
        assert_eq!("P0005", products[4].id().as_str());
        for product in &products {
            let price = product.unit_price().as_decimal();
            assert!(price >= Decimal::from(20_000) && price <= Decimal::from(2_000_000));
        }

        let loaded = catalog::load_products(&path).unwrap();
        assert_eq!(5, loaded.len());
        assert_eq!(products[2], loaded[products[2].id()]);
    }

    #[test]
    fn salespeople_have_unique_document_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salespeople.csv");
        let people = Generator::new(2).create_salespeople_file(&path, 30).unwrap();

        let numbers: HashSet<&str> = people.iter().map(|p| p.document_number()).collect();
        assert_eq!(30, numbers.len());
        for person in &people {
            assert!(DOCUMENT_TYPES.contains(&person.document_type()));
            assert!((8..=10).contains(&person.document_number().len()));
        }
        assert_eq!(30, catalog::load_salespeople(&path).unwrap().len());
    }

    #[test]
    /// Sales lines carry the trailing separator
    fn sales_file_has_header_and_sales() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = Generator::new(3);
        let products = generator
            .create_products_file(&dir.path().join("products.csv"), 3)
            .unwrap();
        let ana = Salesperson::new("CC", "111", "Ana", "Diaz");

        let path = generator.create_sales_file(dir.path(), &ana, &products, 12).unwrap();

        assert_eq!(dir.path().join("CC_111.csv"), path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("CC;111\n"));
        assert_eq!(13, text.lines().count());
        assert!(text.lines().skip(1).all(|l| l.ends_with(';')));

        let body = lines(&path);
        for fields in &body[1..] {
            let quantity: u32 = fields[1].parse().unwrap();
            assert!(QUANTITY_RANGE.contains(&quantity));
        }
    }

    #[test]
    fn empty_catalog_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let ana = Salesperson::new("CC", "111", "Ana", "Diaz");
        let path = Generator::new(4).create_sales_file(dir.path(), &ana, &[], 12).unwrap();
        assert_eq!("CC;111\n", std::fs::read_to_string(path).unwrap());
    }

    #[test]
    fn zero_counts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = Generator::new(5);
        assert!(matches!(
            generator.create_products_file(&dir.path().join("p.csv"), 0),
            Err(PipelineError::InvalidArgument(_))
        ));
        assert!(matches!(
            generator.create_salespeople_file(&dir.path().join("s.csv"), 0),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let options = GenerateOptions::default();

        generate_dataset(&Layout::new(a.path()), &options).unwrap();
        generate_dataset(&Layout::new(b.path()), &options).unwrap();

        let read = |dir: &Path, name: &str| std::fs::read_to_string(dir.join(name)).unwrap();
        assert_eq!(read(a.path(), "products.csv"), read(b.path(), "products.csv"));
        assert_eq!(read(a.path(), "salespeople.csv"), read(b.path(), "salespeople.csv"));
    }
}
