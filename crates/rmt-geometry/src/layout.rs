//! Virtual address bit layouts.
//!
//! Every array kind addresses its entries with a packed virtual address. The
//! low part is always `vpn | line | subword`; some kinds add flag and
//! discriminator bits above it:
//!
//! ```text
//!            addr_bits-1                                          0
//!  ┌─────────┬─────────┬─────┬─────────────┬────────────┬──────────┐
//!  │ (unused)│  type   │ pfe │     vpn     │    line    │ subword  │
//!  └─────────┴─────────┴─────┴─────────────┴────────────┴──────────┘
//! ```
//!
//! The VPN shift of a layout is therefore `subword_bits + line_bits`; for
//! statistics RAM on Tofino that is `3 + 10`.

use crate::error::{GeometryError, GeometryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address kinds that carry a virtual address layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// Statistics RAM.
    Stats,
    /// Meter RAM.
    Meter,
    /// Selector RAM.
    Selector,
    /// Idle-timeout RAM.
    IdleTimeout,
    /// Exact-match SRAM.
    ExactMatch,
    /// Action-data RAM.
    ActionData,
}

impl AddressKind {
    /// All address kinds.
    pub const ALL: [AddressKind; 6] = [
        AddressKind::Stats,
        AddressKind::Meter,
        AddressKind::Selector,
        AddressKind::IdleTimeout,
        AddressKind::ExactMatch,
        AddressKind::ActionData,
    ];
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressKind::Stats => "stats",
            AddressKind::Meter => "meter",
            AddressKind::Selector => "selector",
            AddressKind::IdleTimeout => "idle_timeout",
            AddressKind::ExactMatch => "exact_match",
            AddressKind::ActionData => "action_data",
        };
        write!(f, "{}", s)
    }
}

/// A contiguous run of bits inside an address word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitField {
    /// Least significant bit of the field.
    pub position: u32,
    /// Number of bits.
    pub width: u32,
}

impl BitField {
    /// Creates a bit field.
    pub const fn new(position: u32, width: u32) -> Self {
        Self { position, width }
    }

    /// One past the most significant bit of the field.
    pub const fn end(&self) -> u32 {
        self.position.saturating_add(self.width)
    }

    /// Largest value the field can hold.
    pub const fn max(&self) -> u64 {
        if self.width >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// Returns true if the two fields share at least one bit.
    pub const fn overlaps(&self, other: &BitField) -> bool {
        self.width != 0
            && other.width != 0
            && self.position < other.end()
            && other.position < self.end()
    }

    fn insert(&self, value: u64) -> u32 {
        (value & self.max())
            .checked_shl(self.position)
            .map(|v| v as u32)
            .unwrap_or(0)
    }

    fn extract(&self, addr: u32) -> u64 {
        u64::from(addr).checked_shr(self.position).unwrap_or(0) & self.max()
    }
}

/// Logical position of an entry inside a virtual memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VirtualLocation {
    /// Virtual page number.
    pub vpn: u32,
    /// RAM line within the page.
    #[serde(default)]
    pub line: u32,
    /// Sub-entry within the RAM word.
    pub subword: u32,
}

impl VirtualLocation {
    /// Creates a location on RAM line 0.
    pub const fn new(vpn: u32, subword: u32) -> Self {
        Self {
            vpn,
            line: 0,
            subword,
        }
    }

    /// Returns the location moved to `line`.
    pub const fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

/// Every field of a packed address, including flag and type bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddressFields {
    /// VPN, line and subword.
    pub location: VirtualLocation,
    /// Presence flag (PFE).
    pub pfe: bool,
    /// Kind-specific type discriminator (e.g. meter type).
    pub addr_type: u8,
}

impl AddressFields {
    /// Creates fields for `location` with PFE clear and type 0.
    pub const fn new(location: VirtualLocation) -> Self {
        Self {
            location,
            pfe: false,
            addr_type: 0,
        }
    }

    /// Sets the presence flag.
    pub const fn with_pfe(mut self, pfe: bool) -> Self {
        self.pfe = pfe;
        self
    }

    /// Sets the type discriminator.
    pub const fn with_type(mut self, addr_type: u8) -> Self {
        self.addr_type = addr_type;
        self
    }
}

/// A selector address plus the huffman-coded group overhead carried with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorAddress {
    /// Packed `vpn | line | subword` address.
    pub address: u32,
    /// Huffman overhead bits, kept outside the packed address.
    pub huffman: u8,
}

/// Bit layout of one address kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLayout {
    /// Address kind this layout describes.
    pub kind: AddressKind,
    /// Total address width in bits.
    pub addr_bits: u32,
    /// Width of the subword field (bit 0 upwards).
    pub subword_bits: u32,
    /// Width of the RAM line field.
    pub line_bits: u32,
    /// Width of the VPN field.
    pub vpn_bits: u32,
    /// Position of the presence flag, if the kind has one.
    #[serde(default)]
    pub pfe_bit: Option<u32>,
    /// Type discriminator field, if the kind has one.
    #[serde(default)]
    pub type_field: Option<BitField>,
    /// Bit inside the type field marking a selector-type address.
    #[serde(default)]
    pub selector_type_bit: Option<u32>,
    /// Width of the out-of-band huffman overhead value.
    #[serde(default)]
    pub overhead_bits: u32,
}

impl AddressLayout {
    /// Subword field.
    pub const fn subword_field(&self) -> BitField {
        BitField::new(0, self.subword_bits)
    }

    /// RAM line field.
    pub const fn line_field(&self) -> BitField {
        BitField::new(self.subword_bits, self.line_bits)
    }

    /// VPN field.
    pub const fn vpn_field(&self) -> BitField {
        BitField::new(self.vpn_shift(), self.vpn_bits)
    }

    /// Number of bits the VPN is shifted left by.
    pub const fn vpn_shift(&self) -> u32 {
        self.subword_bits.saturating_add(self.line_bits)
    }

    /// Largest encodable VPN.
    pub const fn max_vpn(&self) -> u32 {
        self.vpn_field().max() as u32
    }

    /// Largest encodable subword.
    pub const fn max_subword(&self) -> u32 {
        self.subword_field().max() as u32
    }

    fn named_fields(&self) -> Vec<(&'static str, BitField)> {
        let mut fields = vec![
            ("subword", self.subword_field()),
            ("line", self.line_field()),
            ("vpn", self.vpn_field()),
        ];
        if let Some(bit) = self.pfe_bit {
            fields.push(("pfe", BitField::new(bit, 1)));
        }
        if let Some(field) = self.type_field {
            fields.push(("type", field));
        }
        fields
    }

    /// Checks that no two fields overlap and that all fit `addr_bits`.
    pub fn validate(&self) -> GeometryResult<()> {
        if self.addr_bits == 0 || self.addr_bits > u32::BITS {
            return Err(GeometryError::invalid(format!(
                "{} address width {} not in 1..=32",
                self.kind, self.addr_bits
            )));
        }
        let fields = self.named_fields();
        for (i, (name, field)) in fields.iter().enumerate() {
            if field.end() > self.addr_bits {
                return Err(GeometryError::TooWide {
                    kind: self.kind,
                    field: *name,
                    end: field.end(),
                    addr_bits: self.addr_bits,
                });
            }
            for (other_name, other) in &fields[i + 1..] {
                if field.overlaps(other) {
                    return Err(GeometryError::Overlap {
                        kind: self.kind,
                        first: *name,
                        second: *other_name,
                    });
                }
            }
        }
        if let Some(field) = self.type_field {
            if field.width > u8::BITS {
                return Err(GeometryError::invalid(format!(
                    "{} type field width {} exceeds 8 bits",
                    self.kind, field.width
                )));
            }
        }
        if let Some(bit) = self.selector_type_bit {
            let inside = self
                .type_field
                .map(|f| bit >= f.position && bit < f.end())
                .unwrap_or(false);
            if !inside {
                return Err(GeometryError::invalid(format!(
                    "{} selector type bit {} is outside the type field",
                    self.kind, bit
                )));
            }
        }
        if self.overhead_bits > u8::BITS {
            return Err(GeometryError::invalid(format!(
                "{} overhead width {} exceeds 8 bits",
                self.kind, self.overhead_bits
            )));
        }
        Ok(())
    }

    fn check(&self, field: &'static str, value: u64, bits: BitField) -> GeometryResult<()> {
        if value > bits.max() {
            return Err(GeometryError::out_of_range(self.kind, field, value, bits.max()));
        }
        Ok(())
    }

    fn check_address(&self, addr: u32) -> GeometryResult<()> {
        let max = BitField::new(0, self.addr_bits).max();
        if u64::from(addr) > max {
            return Err(GeometryError::out_of_range(
                self.kind,
                "address",
                u64::from(addr),
                max,
            ));
        }
        Ok(())
    }

    /// Packs `location` into a virtual address.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::OutOfRange`] if any component does not fit
    /// its field.
    pub fn encode(&self, location: VirtualLocation) -> GeometryResult<u32> {
        let subword = self.subword_field();
        let line = self.line_field();
        let vpn = self.vpn_field();
        self.check("subword", location.subword.into(), subword)?;
        self.check("line", location.line.into(), line)?;
        self.check("vpn", location.vpn.into(), vpn)?;
        Ok(vpn.insert(location.vpn.into())
            | line.insert(location.line.into())
            | subword.insert(location.subword.into()))
    }

    /// Recovers the location from a virtual address, ignoring flag bits.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::OutOfRange`] if `addr` has bits set above
    /// the layout's address width.
    pub fn decode(&self, addr: u32) -> GeometryResult<VirtualLocation> {
        self.check_address(addr)?;
        Ok(VirtualLocation {
            vpn: self.vpn_field().extract(addr) as u32,
            line: self.line_field().extract(addr) as u32,
            subword: self.subword_field().extract(addr) as u32,
        })
    }

    /// Packs the location together with the PFE and type bits.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NoSuchField`] when setting PFE or a non-zero
    /// type on a layout without those fields, and
    /// [`GeometryError::OutOfRange`] when a value does not fit.
    pub fn encode_fields(&self, fields: &AddressFields) -> GeometryResult<u32> {
        let mut addr = self.encode(fields.location)?;
        if fields.pfe {
            let bit = self.pfe_bit.ok_or(GeometryError::NoSuchField {
                kind: self.kind,
                field: "pfe",
            })?;
            addr |= BitField::new(bit, 1).insert(1);
        }
        if fields.addr_type != 0 {
            let field = self.type_field.ok_or(GeometryError::NoSuchField {
                kind: self.kind,
                field: "type",
            })?;
            self.check("type", fields.addr_type.into(), field)?;
            addr |= field.insert(fields.addr_type.into());
        }
        Ok(addr)
    }

    /// Inverse of [`encode_fields`](Self::encode_fields).
    pub fn decode_fields(&self, addr: u32) -> GeometryResult<AddressFields> {
        let location = self.decode(addr)?;
        let pfe = self
            .pfe_bit
            .map(|bit| BitField::new(bit, 1).extract(addr) == 1)
            .unwrap_or(false);
        let addr_type = self.type_field.map(|f| f.extract(addr) as u8).unwrap_or(0);
        Ok(AddressFields {
            location,
            pfe,
            addr_type,
        })
    }

    /// Returns true if `addr_type` marks a selector-type address.
    pub fn is_selector_type(&self, addr_type: u8) -> bool {
        match (self.type_field, self.selector_type_bit) {
            (Some(field), Some(bit)) => bit
                .checked_sub(field.position)
                .map(|offset| (u32::from(addr_type) >> offset) & 1 == 1)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Packs a selector location and carries the huffman overhead with it.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NoSuchField`] if this layout has no overhead
    /// field, and [`GeometryError::OutOfRange`] if a value does not fit.
    pub fn encode_selector(
        &self,
        location: VirtualLocation,
        huffman: u8,
    ) -> GeometryResult<SelectorAddress> {
        if self.overhead_bits == 0 {
            return Err(GeometryError::NoSuchField {
                kind: self.kind,
                field: "huffman",
            });
        }
        self.check("huffman", huffman.into(), BitField::new(0, self.overhead_bits))?;
        Ok(SelectorAddress {
            address: self.encode(location)?,
            huffman,
        })
    }

    /// Inverse of [`encode_selector`](Self::encode_selector).
    pub fn decode_selector(&self, sel: SelectorAddress) -> GeometryResult<(VirtualLocation, u8)> {
        if self.overhead_bits == 0 {
            return Err(GeometryError::NoSuchField {
                kind: self.kind,
                field: "huffman",
            });
        }
        self.check("huffman", sel.huffman.into(), BitField::new(0, self.overhead_bits))?;
        Ok((self.decode(sel.address)?, sel.huffman))
    }
}
