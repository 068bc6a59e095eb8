//! Synthetic PE32 images and VERSIONINFO trees for tests.
//!
//! Only depends on `std` so that the integration tests can include it with `#[path]`.
//!
//! Images produced by [`PeBuilder`] have a fixed layout:
//!
//! ```text
//! 0x000  DOS header, e_lfanew = 0x80
//! 0x080  "PE\0\0", COFF header
//! 0x098  PE32 optional header (0xE0 bytes), resource directory at data directory 2
//! 0x178  section table: .text (RVA 0x1000), .rsrc (RVA 0x2000)
//! 0x200  .text raw data
//! 0x400  .rsrc raw data, the resource directory built by ResourceBuilder
//! ```
//!
//! The image ends exactly at the end of the resource data.
#![allow(dead_code)]

/// File offset of the `.rsrc` raw data.
pub const RSRC_RAW_OFFSET: usize = 0x400;
/// RVA of the `.rsrc` section.
pub const RSRC_RVA: u32 = 0x2000;

const PE_OFFSET: usize = 0x80;
const OPTIONAL_HEADER_OFFSET: usize = 0x98;
const OPTIONAL_HEADER_SIZE: u16 = 0xE0;
const SECTION_TABLE_OFFSET: usize = 0x178;
const TEXT_RAW_OFFSET: usize = 0x200;
const TEXT_RVA: u32 = 0x1000;
const TEXT_SIZE: usize = 0x200;
const RT_VERSION: u32 = 16;

fn align4(offset: usize) -> usize {
    (offset + 3) & !3
}

fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Builds a three-level resource directory with one name and one language per type.
#[derive(Debug, Clone, Default)]
pub struct ResourceBuilder {
    resources: Vec<(u32, Vec<u8>)>,
}

impl ResourceBuilder {
    /// Create an empty resource directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource of `type_id` with the given bytes (name id 1, language 0x409)
    pub fn resource(mut self, type_id: u32, data: Vec<u8>) -> Self {
        self.resources.push((type_id, data));
        self
    }

    fn root_size(&self) -> usize {
        16 + 8 * self.resources.len()
    }

    fn directories_end(&self) -> usize {
        self.root_size() + 48 * self.resources.len()
    }

    fn data_entries_end(&self) -> usize {
        self.directories_end() + 16 * self.resources.len()
    }

    /// Offset of the bytes of resource `index`, relative to the resource directory
    pub fn data_offset(&self, index: usize) -> usize {
        let mut offset = align4(self.data_entries_end());
        for (_, data) in &self.resources[..index] {
            offset = align4(offset + data.len());
        }
        offset
    }

    /// Serialise the directory for a section mapped at `section_rva`
    pub fn build(&self, section_rva: u32) -> Vec<u8> {
        let count = self.resources.len();
        let size = if count == 0 {
            self.root_size()
        } else {
            self.data_offset(count - 1) + self.resources[count - 1].1.len()
        };
        let mut out = vec![0_u8; size];

        put_u16(&mut out, 14, count as u16);

        for (index, (type_id, data)) in self.resources.iter().enumerate() {
            let name_directory = self.root_size() + 48 * index;
            let language_directory = name_directory + 24;
            let data_entry = self.directories_end() + 16 * index;
            let data_offset = self.data_offset(index);

            let entry = 16 + 8 * index;
            put_u32(&mut out, entry, *type_id);
            put_u32(&mut out, entry + 4, 0x8000_0000 | name_directory as u32);

            put_u16(&mut out, name_directory + 14, 1);
            put_u32(&mut out, name_directory + 16, 1);
            put_u32(&mut out, name_directory + 20, 0x8000_0000 | language_directory as u32);

            put_u16(&mut out, language_directory + 14, 1);
            put_u32(&mut out, language_directory + 16, 0x409);
            put_u32(&mut out, language_directory + 20, data_entry as u32);

            put_u32(&mut out, data_entry, section_rva + data_offset as u32);
            put_u32(&mut out, data_entry + 4, data.len() as u32);

            out[data_offset..data_offset + data.len()].copy_from_slice(data);
        }

        out
    }
}

/// Builds a minimal PE32 image around a resource directory.
#[derive(Debug, Clone)]
pub struct PeBuilder {
    optional_magic: u16,
    number_of_sections: u16,
    optional_header_size: u16,
    resource_section_name: String,
    resource_rva: u32,
    resources: ResourceBuilder,
}

impl Default for PeBuilder {
    fn default() -> Self {
        Self {
            optional_magic: 0x10B,
            number_of_sections: 2,
            optional_header_size: OPTIONAL_HEADER_SIZE,
            resource_section_name: ".rsrc".to_string(),
            resource_rva: RSRC_RVA,
            resources: ResourceBuilder::new(),
        }
    }
}

impl PeBuilder {
    /// Create a builder for a valid image with an empty resource directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the optional header magic
    pub fn optional_magic(mut self, magic: u16) -> Self {
        self.optional_magic = magic;
        self
    }

    /// Override `NumberOfSections` (the table itself always holds two entries)
    pub fn number_of_sections(mut self, count: u16) -> Self {
        self.number_of_sections = count;
        self
    }

    /// Override `SizeOfOptionalHeader` (the layout does not move)
    pub fn optional_header_size(mut self, size: u16) -> Self {
        self.optional_header_size = size;
        self
    }

    /// Rename the resource section
    pub fn resource_section_name(mut self, name: &str) -> Self {
        self.resource_section_name = name.to_string();
        self
    }

    /// Override the resource data directory RVA
    pub fn resource_rva(mut self, rva: u32) -> Self {
        self.resource_rva = rva;
        self
    }

    /// Set the resource directory
    pub fn resources(mut self, resources: ResourceBuilder) -> Self {
        self.resources = resources;
        self
    }

    /// Set the version resource to `data`, replacing any other resources
    pub fn version(self, data: Vec<u8>) -> Self {
        self.resources(ResourceBuilder::new().resource(RT_VERSION, data))
    }

    /// Serialise the image
    pub fn build(&self) -> Vec<u8> {
        let resources = self.resources.build(RSRC_RVA);
        let mut out = vec![0_u8; RSRC_RAW_OFFSET + resources.len()];

        // DOS header
        out[0] = b'M';
        out[1] = b'Z';
        put_u32(&mut out, 0x3C, PE_OFFSET as u32);

        // COFF header
        out[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");
        put_u16(&mut out, PE_OFFSET + 4, 0x14C);
        put_u16(&mut out, PE_OFFSET + 6, self.number_of_sections);
        put_u16(&mut out, PE_OFFSET + 20, self.optional_header_size);
        put_u16(&mut out, PE_OFFSET + 22, 0x0102);

        // Optional header
        put_u16(&mut out, OPTIONAL_HEADER_OFFSET, self.optional_magic);
        put_u32(&mut out, OPTIONAL_HEADER_OFFSET + 16, TEXT_RVA);
        put_u32(&mut out, OPTIONAL_HEADER_OFFSET + 28, 0x0040_0000);
        put_u32(&mut out, OPTIONAL_HEADER_OFFSET + 32, 0x1000);
        put_u32(&mut out, OPTIONAL_HEADER_OFFSET + 36, 0x200);
        put_u32(&mut out, OPTIONAL_HEADER_OFFSET + 92, 16);
        put_u32(&mut out, OPTIONAL_HEADER_OFFSET + 112, self.resource_rva);
        put_u32(&mut out, OPTIONAL_HEADER_OFFSET + 116, resources.len() as u32);

        // Section table
        let sections = [
            (".text", TEXT_RVA, TEXT_SIZE, TEXT_RAW_OFFSET),
            (
                self.resource_section_name.as_str(),
                RSRC_RVA,
                resources.len(),
                RSRC_RAW_OFFSET,
            ),
        ];
        for (index, (name, rva, size, raw)) in sections.into_iter().enumerate() {
            let header = SECTION_TABLE_OFFSET + 40 * index;
            let name = name.as_bytes();
            out[header..header + name.len().min(8)].copy_from_slice(&name[..name.len().min(8)]);
            put_u32(&mut out, header + 8, size as u32);
            put_u32(&mut out, header + 12, rva);
            put_u32(&mut out, header + 16, size as u32);
            put_u32(&mut out, header + 20, raw as u32);
        }

        out[TEXT_RAW_OFFSET] = 0xC3;
        out[RSRC_RAW_OFFSET..].copy_from_slice(&resources);
        out
    }
}

#[derive(Debug, Clone)]
enum BlockValue {
    Text(Option<String>),
    Binary(Vec<u8>),
}

/// One VERSIONINFO block and its children.
#[derive(Debug, Clone)]
pub struct Block {
    key: String,
    value: BlockValue,
    children: Vec<Block>,
}

impl Block {
    /// Text block with a NUL-terminated value
    pub fn text(key: impl Into<String>, value: &str) -> Self {
        Self {
            key: key.into(),
            value: BlockValue::Text(Some(value.to_string())),
            children: Vec::new(),
        }
    }

    /// Text block without a value, such as `StringFileInfo`
    pub fn container(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: BlockValue::Text(None),
            children: Vec::new(),
        }
    }

    /// Binary block
    pub fn binary(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value: BlockValue::Binary(value),
            children: Vec::new(),
        }
    }

    /// Append a child block
    pub fn child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    /// Serialise the block; `wLength` excludes trailing padding
    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0_u8; 6];
        for unit in self.key.encode_utf16() {
            out.extend(unit.to_le_bytes());
        }
        out.extend([0, 0]);
        out.resize(align4(out.len()), 0);

        let (value_length, value_type) = match &self.value {
            BlockValue::Text(Some(text)) => {
                let mut units = 0;
                for unit in text.encode_utf16() {
                    out.extend(unit.to_le_bytes());
                    units += 1;
                }
                out.extend([0, 0]);
                (units + 1, 1)
            }
            BlockValue::Text(None) => (0, 1),
            BlockValue::Binary(bytes) => {
                out.extend(bytes);
                (bytes.len(), 0)
            }
        };

        for child in &self.children {
            out.resize(align4(out.len()), 0);
            out.extend(child.build());
        }

        let total_length = out.len() as u16;
        put_u16(&mut out, 0, total_length);
        put_u16(&mut out, 2, value_length as u16);
        put_u16(&mut out, 4, value_type);
        out
    }
}

/// A 52-byte `VS_FIXEDFILEINFO` with the given version words in stream order.
pub fn fixed_file_info(file: [u16; 4], product: [u16; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(52);
    out.extend(0xFEEF_04BD_u32.to_le_bytes());
    out.extend(0x0001_0000_u32.to_le_bytes());
    for word in file.into_iter().chain(product) {
        out.extend(word.to_le_bytes());
    }
    // Flags mask, flags, OS, type, subtype, date
    out.extend(0x3F_u32.to_le_bytes());
    out.extend(0_u32.to_le_bytes());
    out.extend(0x0004_0004_u32.to_le_bytes());
    out.extend(1_u32.to_le_bytes());
    out.extend([0_u8; 12]);
    out
}

/// A representative VERSIONINFO resource.
///
/// Fixed file and product version are both `1.2.3.4`; the string table overrides the product
/// version with `1.2.3-beta`.
pub fn sample_version_info() -> Vec<u8> {
    Block::binary("VS_VERSION_INFO", fixed_file_info([2, 1, 4, 3], [2, 1, 4, 3]))
        .child(
            Block::container("StringFileInfo").child(
                Block::container("040904b0")
                    .child(Block::text("CompanyName", "Example Corp"))
                    .child(Block::text("FileDescription", "Example App"))
                    .child(Block::text("InternalName", "example"))
                    .child(Block::text("LegalCopyright", "Copyright (C) Example Corp"))
                    .child(Block::text("OriginalFilename", "example.exe"))
                    .child(Block::text("ProductName", "Example"))
                    .child(Block::text("ProductVersion", "1.2.3-beta")),
            ),
        )
        .child(
            Block::container("VarFileInfo")
                .child(Block::binary("Translation", vec![0x09, 0x04, 0xB0, 0x04])),
        )
        .build()
}

/// A PE32 image carrying [`sample_version_info`].
pub fn sample_image() -> Vec<u8> {
    PeBuilder::new().version(sample_version_info()).build()
}
