// Copyright 2024 The ironic-drivers Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Various utilities.

/// Enumeration with a fixed string representation.
macro_rules! protocol_enum {
    {$(#[$attr:meta])* enum $name:ident {
        $($(#[$iattr:meta])* $item:ident = $val:literal),+
    }} => (
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$iattr])* $item),+,
        }

        impl $name {
            /// String representation of the value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$item => $val),+,
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(value: &str) -> $crate::Result<$name> {
                match value {
                    $($val => Ok($name::$item)),+,
                    other => Err($crate::Error::new(
                        $crate::ErrorKind::InvalidParameter,
                        format!("Invalid {} value: {}", stringify!($name), other),
                    )),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::ser::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::ser::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<$name, D::Error>
            where
                D: ::serde::de::Deserializer<'de>,
            {
                let value = <String as ::serde::de::Deserialize>::deserialize(deserializer)?;
                value
                    .parse::<$name>()
                    .map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    );
}

/// Remove duplicates while keeping the original order.
pub(crate) fn unique<T: PartialEq, I: IntoIterator<Item = T>>(items: I) -> Vec<T> {
    let mut result = Vec::new();
    for item in items {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use super::unique;

    protocol_enum! {
        #[allow(missing_docs)]
        enum Colour {
            Red = "red",
            LightBlue = "light blue"
        }
    }

    #[test]
    fn test_protocol_enum_str() {
        assert_eq!(Colour::LightBlue.as_str(), "light blue");
        assert_eq!(Colour::Red.to_string(), "red");
        assert_eq!("light blue".parse::<Colour>().unwrap(), Colour::LightBlue);
        assert!("blue".parse::<Colour>().is_err());
    }

    #[test]
    fn test_protocol_enum_serde() {
        let value = serde_json::to_value(Colour::LightBlue).unwrap();
        assert_eq!(value, serde_json::json!("light blue"));
        let back: Colour = serde_json::from_value(serde_json::json!("red")).unwrap();
        assert_eq!(back, Colour::Red);
        assert!(serde_json::from_value::<Colour>(serde_json::json!("green")).is_err());
    }

    #[test]
    fn test_unique() {
        assert_eq!(unique(vec!["a", "b", "a", "c", "b"]), vec!["a", "b", "c"]);
        assert!(unique(Vec::<u8>::new()).is_empty());
    }
}
