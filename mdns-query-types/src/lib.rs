use std::fmt;

pub const CLASS_IN: u16 = 1;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum QType {
    A,
    Ptr,
    Txt,
    Srv,
    Other(u16),
}

impl From<u16> for QType {
    fn from(v: u16) -> Self {
        match v {
            1 => QType::A,
            12 => QType::Ptr,
            16 => QType::Txt,
            33 => QType::Srv,
            other => QType::Other(other),
        }
    }
}

impl From<QType> for u16 {
    fn from(q_type: QType) -> Self {
        match q_type {
            QType::A => 1,
            QType::Ptr => 12,
            QType::Txt => 16,
            QType::Srv => 33,
            QType::Other(v) => v,
        }
    }
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QType::A => write!(f, "A"),
            QType::Ptr => write!(f, "PTR"),
            QType::Txt => write!(f, "TXT"),
            QType::Srv => write!(f, "SRV"),
            QType::Other(v) => write!(f, "TYPE{}", v),
        }
    }
}

pub type Name = String;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NameQuery {
    pub name: Name,
    pub q_type: QType,
    pub q_class: u16,
}

impl NameQuery {
    pub fn new(name_str: &str, q_type: QType) -> Self {
        Self {
            name: Name::from(name_str),
            q_type,
            q_class: CLASS_IN,
        }
    }

    pub fn a_record(name_str: &str) -> Self {
        Self::new(name_str, QType::A)
    }

    pub fn ptr_record(name_str: &str) -> Self {
        Self::new(name_str, QType::Ptr)
    }

    pub fn srv_record(name_str: &str) -> Self {
        Self::new(name_str, QType::Srv)
    }
}

impl fmt::Display for NameQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.name, self.q_type)
    }
}
