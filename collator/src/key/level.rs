/// минимальная емкость уровня после первого расширения
const MIN_CAPACITY: usize = 200;

/// байты одного уровня ключа
#[derive(Debug, Default, Clone)]
pub struct SortKeyLevel
{
    bytes: Vec<u8>,
}

impl SortKeyLevel
{
    pub fn new() -> Self
    {
        Self::default()
    }

    #[inline(always)]
    pub fn len(&self) -> usize
    {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool
    {
        self.bytes.is_empty()
    }

    #[inline(always)]
    pub fn last(&self) -> Option<u8>
    {
        self.bytes.last().copied()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8]
    {
        &self.bytes
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8]
    {
        &mut self.bytes
    }

    pub fn into_vec(self) -> Vec<u8>
    {
        self.bytes
    }

    /// рост не меньше чем вдвое, с нижней границей; записанные байты сохраняются
    #[inline(always)]
    fn ensure_capacity(&mut self, append: usize)
    {
        let len = self.bytes.len();

        if len + append <= self.bytes.capacity() {
            return;
        }

        let capacity = (2 * self.bytes.capacity())
            .max(len + 2 * append)
            .max(MIN_CAPACITY);

        self.bytes.reserve_exact(capacity - len);
    }

    #[inline(always)]
    pub fn append_byte(&mut self, byte: u8)
    {
        self.ensure_capacity(1);
        self.bytes.push(byte);
    }

    pub fn append_bytes(&mut self, bytes: &[u8])
    {
        self.ensure_capacity(bytes.len());
        self.bytes.extend_from_slice(bytes);
    }

    /// 16-битный вес без завершающего нулевого байта
    #[inline(always)]
    pub fn append_weight16(&mut self, weight: u32)
    {
        let (b0, b1) = ((weight >> 8) as u8, weight as u8);

        self.ensure_capacity(2);
        self.bytes.push(b0);

        if b1 != 0 {
            self.bytes.push(b1);
        }
    }

    /// 32-битный вес без завершающих нулевых байт
    #[inline(always)]
    pub fn append_weight32(&mut self, weight: u32)
    {
        let bytes = weight.to_be_bytes();

        let length = match bytes {
            [_, 0, _, _] => 1,
            [_, _, 0, _] => 2,
            [_, _, _, 0] => 3,
            _ => 4,
        };

        self.append_bytes(&bytes[.. length]);
    }

    /// 16-битный вес с обратным порядком байт (уровень будет развернут целиком)
    #[inline(always)]
    pub fn append_reverse_weight16(&mut self, weight: u32)
    {
        let (b0, b1) = ((weight >> 8) as u8, weight as u8);

        self.ensure_capacity(2);

        if b1 != 0 {
            self.bytes.push(b1);
        }

        self.bytes.push(b0);
    }

    /// все байты, кроме последнего (завершающего уровень NO_CE)
    #[inline(always)]
    pub fn without_terminator(&self) -> &[u8]
    {
        match self.bytes.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn weights_skip_zero_bytes()
    {
        let mut level = SortKeyLevel::new();

        level.append_weight32(0x2A08_0000);
        level.append_weight32(0xE401_0203);
        level.append_weight16(0x0500);
        level.append_reverse_weight16(0x5104);

        assert_eq!(level.as_slice(), [0x2A, 0x08, 0xE4, 0x01, 0x02, 0x03, 0x05, 0x04, 0x51]);
    }

    #[test]
    fn growth_keeps_bytes()
    {
        let mut level = SortKeyLevel::new();

        for i in 0 .. 1000u32 {
            level.append_byte(i as u8);
        }

        assert!(level.as_slice().iter().enumerate().all(|(i, &b)| b == i as u8));
        assert!(level.as_slice().len() == 1000);
    }
}
